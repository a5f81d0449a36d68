//! Command arbitration and wire framing, driven through `Panel`

mod common;

use common::{attached_panel, run_to_idle, step, BusEvent, NullScheduler, RecordingBus};
use ledkey_core::{BusMode, CommandKind, Panel, PanelConfig, SegmentFramebuffer};

#[test]
fn test_init_pushes_config_then_blank_segments() {
    let panel: Panel<RecordingBus> = Panel::new();
    let bus = RecordingBus::new();
    let mut scheduler = NullScheduler::default();

    panel.write_digit(0, 8);
    panel.init(bus.clone(), &mut scheduler, 10, 20).unwrap();
    assert_eq!(panel.active(), Some(CommandKind::WriteConfig));
    assert!(panel.pending().contains(CommandKind::WriteSegments));

    run_to_idle(&panel, &bus);

    let frames = bus.state.borrow().frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], vec![0x8B]);
    assert_eq!(frames[1], vec![0x40]);
    // Framebuffer was cleared by init
    assert_eq!(frames[2][0], 0xC0);
    assert!(frames[2][1..].iter().all(|&byte| byte == 0));

    assert_eq!(
        scheduler.registered,
        vec![
            (ledkey_core::RefreshTask::Rescan, 10, 10),
            (ledkey_core::RefreshTask::Repaint, 15, 20),
        ]
    );
}

#[test]
fn test_write_config_framing() {
    let (panel, bus) = attached_panel();

    panel.set_brightness(7);
    assert_eq!(run_to_idle(&panel, &bus), 1);

    let state = bus.state.borrow();
    assert_eq!(
        state.events,
        vec![
            BusEvent::Select,
            BusEvent::Send(0x8F),
            BusEvent::Listen(true),
            BusEvent::Deselect,
            BusEvent::Listen(false),
        ]
    );
}

#[test]
fn test_write_segments_framing() {
    let (panel, bus) = attached_panel();

    panel.write_digit(0, 1);
    panel.write_digit(9, 1);
    panel.request_write_segments();
    assert_eq!(run_to_idle(&panel, &bus), CommandKind::WriteSegments.events() as usize);

    let state = bus.state.borrow();
    let frames = state.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], vec![0x40]);

    // Re-selected frame: set-address plus 16 payload bytes
    assert_eq!(frames[1].len(), 17);
    assert_eq!(frames[1][0], 0xC0);
    assert_eq!(&frames[1][1..], &panel.framebuffer().snapshot());
    assert_eq!(frames[1][3], 0x01);
    assert_eq!(frames[1][4], 0x02);

    assert!(!state.selected);
    assert!(!state.listening);
}

#[test]
fn test_read_keys_framing_and_mode() {
    let (panel, bus) = attached_panel();

    bus.load_scan([0x02, 0x00, 0x20, 0x00]);
    panel.request_read_keys();
    assert_eq!(bus.state.borrow().mode, BusMode::Transmit);
    assert_eq!(run_to_idle(&panel, &bus), 5);

    let state = bus.state.borrow();
    assert_eq!(
        state.events,
        vec![
            BusEvent::Select,
            BusEvent::Send(0x42),
            BusEvent::Listen(true),
            BusEvent::Mode(BusMode::Receive),
            BusEvent::Send(0xFF),
            BusEvent::Send(0xFF),
            BusEvent::Send(0xFF),
            BusEvent::Send(0xFF),
            BusEvent::Mode(BusMode::Transmit),
            BusEvent::Deselect,
            BusEvent::Listen(false),
        ]
    );
    assert_eq!(state.mode, BusMode::Transmit);
    assert_eq!(panel.get_keys(), 0x0020_0002);
}

#[test]
fn test_snapshot_replaced_as_a_whole() {
    let (panel, bus) = attached_panel();

    bus.load_scan([0x0A, 0x0B, 0x0C, 0x0D]);
    panel.request_read_keys();
    run_to_idle(&panel, &bus);
    assert_eq!(panel.get_keys(), 0x0D0C_0B0A);

    bus.load_scan([0x01, 0x02, 0x03, 0x04]);
    panel.request_read_keys();
    for _ in 0..4 {
        assert!(step(&panel, &bus));
        // Partial scans never leak
        assert_eq!(panel.get_keys(), 0x0D0C_0B0A);
    }
    assert!(step(&panel, &bus));
    assert_eq!(panel.get_keys(), 0x0403_0201);
}

#[test]
fn test_priority_after_in_flight_command() {
    let (panel, bus) = attached_panel();

    panel.request_read_keys();
    panel.request_write_segments();
    panel.set_enabled(false);
    assert_eq!(panel.active(), Some(CommandKind::ReadKeys));
    assert_eq!(panel.pending().len(), 2);

    run_to_idle(&panel, &bus);

    let frames = bus.state.borrow().frames();
    let openings: Vec<u8> = frames.iter().map(|frame| frame[0]).collect();
    // Config (bit 0) beats segments (bit 2)
    assert_eq!(openings, vec![0x42, 0x83, 0x40, 0xC0]);
}

#[test]
fn test_next_command_starts_inside_handler() {
    let (panel, bus) = attached_panel();

    panel.set_enabled(true);
    panel.request_write_segments();
    assert_eq!(panel.active(), Some(CommandKind::WriteConfig));

    // The event that finishes the config write also starts the segment write
    assert!(step(&panel, &bus));
    assert_eq!(panel.active(), Some(CommandKind::WriteSegments));
    assert!(bus.in_flight());
    assert!(panel.pending().is_empty());

    let state = bus.state.borrow();
    let tail = &state.events[state.events.len() - 4..];
    assert_eq!(
        tail,
        &[
            BusEvent::Deselect,
            BusEvent::Select,
            BusEvent::Send(0x40),
            BusEvent::Listen(true),
        ]
    );
}

#[test]
fn test_duplicate_requests_coalesce() {
    let (panel, bus) = attached_panel();

    panel.request_read_keys();
    for _ in 0..3 {
        panel.request_write_segments();
    }
    assert_eq!(panel.pending().len(), 1);

    assert_eq!(run_to_idle(&panel, &bus), 5 + 18);
    assert_eq!(bus.state.borrow().frames().len(), 3);
}

#[test]
fn test_segment_write_sends_buffer_as_of_start() {
    let (panel, bus) = attached_panel();

    panel.request_read_keys();
    panel.request_write_segments();
    panel.write_digit(0, 1);
    panel.request_write_segments();
    panel.write_digit(0, 2);
    run_to_idle(&panel, &bus);

    let expected = SegmentFramebuffer::new();
    expected.write_digit(0, 2);

    let frames = bus.state.borrow().frames();
    let segment_frames: Vec<&Vec<u8>> = frames.iter().filter(|frame| frame[0] == 0xC0).collect();
    assert_eq!(segment_frames.len(), 1);
    assert_eq!(&segment_frames[0][1..], &expected.snapshot());
}

#[test]
fn test_request_for_active_kind_is_absorbed() {
    let (panel, bus) = attached_panel();

    panel.request_read_keys();
    assert_eq!(panel.active(), Some(CommandKind::ReadKeys));

    panel.request_read_keys();
    assert_eq!(panel.active(), Some(CommandKind::ReadKeys));
    assert!(panel.pending().is_empty());

    assert_eq!(run_to_idle(&panel, &bus), 5);
    assert_eq!(bus.state.borrow().frames().len(), 1);
}

#[test]
fn test_init_resets_display_state() {
    let panel: Panel<RecordingBus> = Panel::new();
    panel.set_brightness(7);
    panel.set_enabled(false);
    assert_eq!(panel.display().command(), 0x87);

    let bus = RecordingBus::new();
    let mut scheduler = NullScheduler::default();
    panel.init(bus.clone(), &mut scheduler, 0, 0).unwrap();
    run_to_idle(&panel, &bus);

    assert_eq!(panel.display().command(), 0x8B);
    let frames = bus.state.borrow().frames();
    assert!(frames.iter().all(|frame| frame[0] != 0x87));
    assert_eq!(frames.last().map(|frame| frame[0]), Some(0xC0));
    assert!(frames.iter().any(|frame| frame == &vec![0x8B]));
}

#[test]
fn test_start_applies_config_after_reset() {
    let panel: Panel<RecordingBus> = Panel::new();
    panel.set_brightness(1);

    let bus = RecordingBus::new();
    let mut scheduler = NullScheduler::default();
    let config = PanelConfig {
        rescan_interval_ms: 0,
        repaint_interval_ms: 0,
        brightness: 6,
        enabled: true,
    };
    panel.start(bus.clone(), &mut scheduler, &config).unwrap();
    run_to_idle(&panel, &bus);

    assert_eq!(panel.display().command(), 0x8E);
    let frames = bus.state.borrow().frames();
    assert!(frames.iter().any(|frame| frame == &vec![0x8E]));
    assert!(frames.iter().all(|frame| frame[0] != 0x89));
}

#[test]
fn test_requests_before_init_are_kept() {
    let panel: Panel<RecordingBus> = Panel::new();
    panel.request_read_keys();
    assert_eq!(panel.active(), None);
    assert!(panel.pending().contains(CommandKind::ReadKeys));

    let bus = RecordingBus::new();
    let mut scheduler = NullScheduler::default();
    panel.init(bus.clone(), &mut scheduler, 0, 0).unwrap();

    // Earlier request runs first, then config outranks segments
    assert_eq!(panel.active(), Some(CommandKind::ReadKeys));
    run_to_idle(&panel, &bus);

    let frames = bus.state.borrow().frames();
    let openings: Vec<u8> = frames.iter().map(|frame| frame[0]).collect();
    assert_eq!(openings, vec![0x42, 0x8B, 0x40, 0xC0]);
    assert!(scheduler.registered.is_empty());
}

#[test]
fn test_stray_event_when_idle() {
    let (panel, bus) = attached_panel();

    // Fake a completion with nothing in flight
    bus.state.borrow_mut().in_flight = true;
    panel.on_transfer_complete();

    let state = bus.state.borrow();
    assert!(!state.in_flight);
    assert_eq!(state.events, vec![BusEvent::Listen(false)]);
    assert_eq!(panel.active(), None);
}

#[test]
fn test_refresh_fire_maps_to_commands() {
    let (panel, bus) = attached_panel();

    panel.fire(ledkey_core::RefreshTask::Repaint);
    assert_eq!(panel.active(), Some(CommandKind::WriteSegments));
    panel.fire(ledkey_core::RefreshTask::Rescan);
    assert!(panel.pending().contains(CommandKind::ReadKeys));
    run_to_idle(&panel, &bus);
}
