//! The stock machines run end to end through the frame timeline.

use approx::assert_abs_diff_eq;
use karakuri_machine_core::{
    Banner, BannerState, Cam, Crank, Jack, JackState, LidBox, LidState, Machine, MachineId,
    MachineSystem, Part, PartId, TriggerState,
};
use karakuri_machine_recipes::StandardMachines;

/// First part of the requested concrete type, scanning container order.
fn find_part<T: 'static>(machine: &Machine) -> &T {
    (0..machine.len() as u32)
        .find_map(|index| {
            machine
                .part(PartId(index))
                .ok()
                .and_then(|part| part.as_any().downcast_ref::<T>())
        })
        .expect("part of requested type")
}

fn standard_system() -> MachineSystem {
    MachineSystem::new(Box::new(StandardMachines::new("images")))
}

/// First frame whose picture has the key already dropped.
fn first_fired_frame(system: &mut MachineSystem) -> u64 {
    for frame in 1..=200 {
        system.seek_to_frame(frame).expect("seek");
        if find_part::<Cam>(system.machine()).state() == TriggerState::Fired {
            return frame;
        }
    }
    panic!("cam never fired within 200 frames");
}

/// it should open the box and bounce the figure in machine 1
#[test]
fn machine_1_runs_its_whole_act() {
    let mut system = standard_system();
    assert_eq!(system.machine_id(), MachineId(1));
    assert_eq!(system.machine().len(), 5);

    system.seek_to_frame(60).expect("seek");

    assert_abs_diff_eq!(find_part::<Crank>(system.machine()).turns(), 1.0, epsilon = 1e-9);
    assert_eq!(find_part::<Cam>(system.machine()).state(), TriggerState::Fired);
    assert_eq!(find_part::<LidBox>(system.machine()).state(), LidState::Open);
    assert_eq!(find_part::<Jack>(system.machine()).state(), JackState::Bouncing);
}

/// it should carry the crank through both belts to the finale in machine 2
#[test]
fn machine_2_runs_its_whole_act() {
    let mut system = standard_system();
    system.choose_machine(MachineId(2));
    assert_eq!(system.machine().len(), 12);

    system.seek_to_frame(60).expect("seek");

    assert_eq!(find_part::<LidBox>(system.machine()).state(), LidState::Open);
    assert_eq!(find_part::<Jack>(system.machine()).state(), JackState::Bouncing);
    let banner = find_part::<Banner>(system.machine());
    assert_eq!(banner.state(), BannerState::Unfurling);
    // The key drops in frame 25 and the banner updates after the crank,
    // so frames 25 through 60 all grow the cloth.
    assert_abs_diff_eq!(banner.progress(), 36.0 * 41.65 / 30.0, epsilon = 1e-9);
}

/// it should drop machine 1's key earlier than machine 2's
#[test]
fn hole_offsets_stagger_the_key_drops() {
    let mut system = standard_system();
    let machine_1_drop = first_fired_frame(&mut system);

    system.choose_machine(MachineId(2));
    let machine_2_drop = first_fired_frame(&mut system);

    // Machine 1 offsets the hole a quarter turn toward the key.
    assert_eq!(machine_1_drop, 10);
    assert_eq!(machine_2_drop, 25);
}

/// it should replay the key drop at the same frame after a backward seek
#[test]
fn key_drop_frame_survives_replay() {
    let mut system = standard_system();
    system.choose_machine(MachineId(2));

    let first = first_fired_frame(&mut system);
    system.seek_to_frame(0).expect("seek");
    let replayed = first_fired_frame(&mut system);

    assert_eq!(first, replayed);
}

/// it should serve machine 2 for any unrecognized number
#[test]
fn unknown_machine_numbers_fall_back_to_machine_2() {
    let mut system = standard_system();
    system.choose_machine(MachineId(7));
    assert_eq!(system.machine_id(), MachineId(7));
    assert_eq!(system.machine().len(), 12);
}
