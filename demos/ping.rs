//=========================================================================
// Ping Demo
//
// Wires a dispatcher, an input manager and a state machine together the
// way an application's composition root would.
//
// Run with:
//   RUST_LOG=debug cargo run --example ping
//
//=========================================================================

use std::sync::Arc;
use std::thread;

use aetheric_dispatch::core::global;
use aetheric_dispatch::prelude::*;
use log::info;

#[derive(Debug)]
struct Ping(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GameAction {
    Jump,
    Aim,
}
impl Action for GameAction {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GameState {
    Menu,
    Playing,
}
impl StateKey for GameState {}

struct Scoreboard;

impl Handler<Ping> for Scoreboard {
    fn handle(&self, ping: &Ping) {
        info!("scoreboard saw ping #{}", ping.0);
    }
}

impl Handler<StateChanged<GameState>> for Scoreboard {
    fn handle(&self, change: &StateChanged<GameState>) {
        info!("scoreboard saw {:?} -> {:?}", change.previous, change.next);
    }
}

fn main() -> Result<(), DispatchError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dispatcher = global::install(
        DispatcherBuilder::new()
            .with_label("demo")
            .with_channel_capacity(16)
            .build(),
    )?;

    //--- Subscribers -------------------------------------------------------
    let scoreboard = Arc::new(Scoreboard);
    dispatcher.subscribe_handler::<Ping, _>(Arc::clone(&scoreboard));
    dispatcher.subscribe_handler::<StateChanged<GameState>, _>(Arc::clone(&scoreboard));

    let logger = dispatcher.subscribe_fn(|ping: &Ping| info!("callback saw ping #{}", ping.0));
    dispatcher.subscribe_fn(|ping: &Ping| {
        if ping.0 == 2 {
            panic!("ping #2 is cursed");
        }
    });
    dispatcher.subscribe_fn(|event: &ActionEvent<GameAction>| {
        info!("action {:?} {:?} {:?}", event.action, event.phase, event.value);
    });

    //--- Direct publication ------------------------------------------------
    let report = dispatcher.publish(Ping(1));
    info!("ping #1: {:?}", report);

    let report = dispatcher.publish(Ping(2));
    info!("ping #2: {:?} (failure contained)", report);

    dispatcher.unsubscribe::<Ping>(&logger);
    dispatcher.publish(Ping(3));

    //--- Remote publication ------------------------------------------------
    let remote = dispatcher.remote();
    thread::spawn(move || remote.publish(Ping(4)))
        .join()
        .unwrap_or(Err(DispatchError::Disconnected))?;
    info!("pumped {} remote messages", dispatcher.pump());

    //--- Collaborators -----------------------------------------------------
    let mut state = StateMachine::new(GameState::Menu);
    state.transition_to(GameState::Playing, dispatcher);

    let mut input = InputManager::new();
    input.bind(Binding::Key(KeyCode::Space), GameAction::Jump);
    input.bind(Binding::Pointer, GameAction::Aim);
    input.process(
        &[
            RawInput::KeyDown(KeyCode::Space),
            RawInput::MouseMoved { x: 320.0, y: 240.0 },
            RawInput::KeyUp(KeyCode::Space),
        ],
        dispatcher,
    );

    //--- Teardown ----------------------------------------------------------
    input.disable(dispatcher);
    global::dispatcher().clear();
    info!("dispatcher cleared: {:?}", global::dispatcher());
    Ok(())
}
