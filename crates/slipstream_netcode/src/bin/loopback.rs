//! Loopback session: one owning client, the authoritative server, and one
//! remote observer, wired over in-process channels.
//!
//! Runs a few seconds of fixed ticks with scripted controls, checks that the
//! predicted client and the authoritative server agree, and prints a small
//! report.

use slipstream_netcode::{
    transport, Character, ControlState, FlatGround, InputCommand, InterpolatedState, NetConfig,
    OwnerToken, PredictedState,
};

const TICKS: u32 = 300;

/// Scripted controls: forward, then forward-right, then idle.
fn controls_at(tick: u32) -> ControlState {
    match tick {
        0..=119 => ControlState {
            forward: true,
            ..ControlState::default()
        },
        120..=219 => ControlState {
            forward: true,
            right: true,
            ..ControlState::default()
        },
        _ => ControlState::default(),
    }
}

fn main() {
    let config = NetConfig::default();
    let motion = config.motion();
    let delta = config.fixed_delta();
    let world = FlatGround;
    let owner = OwnerToken(1);

    let mut client = Character::local(owner);
    let mut server = Character::authoritative(owner, config.history_capacity);
    let mut observer =
        Character::remote(owner, config.snapshot_interval(), config.interpolation_delay());

    let (input_tx, input_rx) = transport::reliable::<InputCommand>();
    let (ack_tx, ack_rx) = transport::unreliable::<PredictedState>();
    let (snapshot_tx, snapshot_rx) = transport::unreliable::<InterpolatedState>();

    let mut commands_sent = 0u32;
    let mut acks_applied = 0u32;
    let mut snapshots_rendered = 0u32;

    for tick in 0..TICKS {
        // Owning client: reconcile (inside the tick), predict, forward.
        if let Some(ack) = ack_rx.latest() {
            client.receive_ack(ack);
            acks_applied += 1;
        }
        if let Some(command) = client.local_tick(controls_at(tick), delta, &motion, &world) {
            input_tx.send(command);
            commands_sent += 1;
        }

        // Server: drain arrivals, resolve, acknowledge, broadcast.
        for command in input_rx.drain() {
            server.receive_input(command);
        }
        if let Some(update) = server.authoritative_tick(delta, &motion, &world) {
            ack_tx.send(update.ack);
            snapshot_tx.send(update.snapshot);
        }

        // Observer: buffer snapshots, render between the two newest.
        for snapshot in snapshot_rx.drain() {
            observer.receive_snapshot(snapshot);
        }
        observer.remote_tick(delta);
        snapshots_rendered += 1;
    }

    let client_pos = client.pose().position;
    let server_pos = server.pose().position;
    let observer_pos = observer.pose().position;
    let divergence = client_pos.distance(server_pos);
    let observer_lag = observer_pos.distance(server_pos);

    println!("┌──────────────────────────────────────────────────────────┐");
    println!("│ loopback session report                                  │");
    println!("├──────────────────────────────────────────────────────────┤");
    println!("│ ticks:              {TICKS:>8}                             │");
    println!("│ commands sent:      {commands_sent:>8}                             │");
    println!("│ acks applied:       {acks_applied:>8}                             │");
    println!("│ frames rendered:    {snapshots_rendered:>8}                             │");
    println!(
        "│ client pose:     ({:>7.3}, {:>6.3}, {:>8.3})               │",
        client_pos.x, client_pos.y, client_pos.z
    );
    println!(
        "│ server pose:     ({:>7.3}, {:>6.3}, {:>8.3})               │",
        server_pos.x, server_pos.y, server_pos.z
    );
    println!(
        "│ observer pose:   ({:>7.3}, {:>6.3}, {:>8.3})               │",
        observer_pos.x, observer_pos.y, observer_pos.z
    );
    println!("│ client/server divergence: {divergence:>10.6}                    │");
    println!("│ observer lag distance:    {observer_lag:>10.6}                    │");
    println!("└──────────────────────────────────────────────────────────┘");

    // Lossless loopback: prediction and authority must agree exactly.
    assert!(
        divergence < 1e-4,
        "client diverged from server by {divergence}"
    );
    // The observer trails the server but must be in the same neighborhood
    // once movement has stopped.
    assert!(
        observer_lag < 0.5,
        "observer fell too far behind: {observer_lag}"
    );

    println!("loopback session converged");
}
