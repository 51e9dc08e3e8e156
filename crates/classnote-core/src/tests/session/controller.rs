use crate::{
    CaptureError, DialogKind, ExitDialog, RecordingStatus, SaveError, SessionError,
    tests::doubles::{AcquireFailure, Harness, count},
};

use std::panic::Location;

use error_location::ErrorLocation;

fn sink_failure() -> SaveError {
    SaveError::Encoding {
        reason: "disk full".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// WHAT: Start acquires the microphone and starts one timer
/// WHY: The recording state must own both resources from the first tick
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_session_when_started_then_recording_with_capture_and_timer() {
    // Given: A freshly opened session
    let mut h = Harness::new();
    assert_eq!(h.session.status(), RecordingStatus::Idle);

    // When: Starting
    h.session.start().unwrap();

    // Then: Recording, one acquire, one timer, elapsed reset
    assert_eq!(h.session.status(), RecordingStatus::Recording);
    assert!(h.session.is_capture_held());
    assert!(h.session.is_timer_running());
    assert_eq!(h.session.elapsed_seconds(), 0);
    assert_eq!(count(&h.capture.acquire), 1);
    assert_eq!(count(&h.timer.start), 1);
}

/// WHAT: Failed acquisition leaves the session idle and empty-handed
/// WHY: A denied prompt must not leak a half-open stream or a timer
#[test]
fn given_unavailable_microphone_when_starting_then_stays_idle_and_holds_nothing() {
    for failure in [AcquireFailure::Denied, AcquireFailure::Unavailable] {
        // Given: A platform that refuses the microphone
        let mut h = Harness::failing(failure);

        // When: Starting
        let result = h.session.start();

        // Then: Capture error surfaced, nothing held, still idle
        match (failure, result) {
            (
                AcquireFailure::Denied,
                Err(SessionError::Capture {
                    source: CaptureError::PermissionDenied { .. },
                    ..
                }),
            ) => {}
            (
                AcquireFailure::Unavailable,
                Err(SessionError::Capture {
                    source: CaptureError::DeviceUnavailable { .. },
                    ..
                }),
            ) => {}
            (_, other) => unreachable!("unexpected start result: {:?}", other),
        }
        assert_eq!(h.session.status(), RecordingStatus::Idle);
        assert!(!h.session.is_capture_held());
        assert!(!h.session.is_timer_running());
        assert_eq!(count(&h.timer.start), 0);
        assert_eq!(count(&h.capture.held), 0);
    }
}

/// WHAT: Start while active neither re-acquires nor resets elapsed time
/// WHY: A double click on Start must not restart the lecture
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_started_again_then_no_reacquire_and_elapsed_kept() {
    // Given: A session recording for 3 seconds
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(3);

    // When: Starting again while recording, and again while paused
    h.session.start().unwrap();
    h.session.pause();
    h.session.start().unwrap();

    // Then: Still one acquire, one timer start, elapsed untouched
    assert_eq!(count(&h.capture.acquire), 1);
    assert_eq!(count(&h.timer.start), 1);
    assert_eq!(h.session.elapsed_seconds(), 3);
    assert_eq!(h.session.status(), RecordingStatus::Paused);
}

/// WHAT: Pause mutes and cancels once; a second pause does nothing
/// WHY: Double-cancel of a timer handle is a lifecycle bug
#[test]
#[allow(clippy::unwrap_used)]
fn given_paused_session_when_paused_again_then_no_double_cancel() {
    // Given: A paused session
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.pause();

    // When: Pausing again
    h.session.pause();

    // Then: One mute, one cancel, capture still held
    assert_eq!(h.session.status(), RecordingStatus::Paused);
    assert_eq!(count(&h.capture.mute), 1);
    assert_eq!(count(&h.timer.cancel), 1);
    assert!(h.session.is_capture_held());
    assert!(!h.session.is_timer_running());
}

/// WHAT: Resume while recording does not start a second timer
/// WHY: Two live timers would double-count elapsed seconds
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_resumed_then_no_second_timer() {
    // Given: A recording session
    let mut h = Harness::new();
    h.session.start().unwrap();

    // When: Resuming without pausing
    h.session.resume();

    // Then: Still exactly one timer running and no unmute
    assert_eq!(count(&h.timer.start), 1);
    assert_eq!(count(&h.timer.running), 1);
    assert_eq!(count(&h.capture.unmute), 0);
}

/// WHAT: Elapsed time continues across pause/resume
/// WHY: The counter only resets on a full stop
#[test]
#[allow(clippy::unwrap_used)]
fn given_pause_resume_cycle_when_ticking_then_elapsed_accumulates() {
    // Given: start, 4 ticks, pause
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(4);
    h.session.pause();
    let first_pause = h.session.elapsed_seconds();

    // When: resume, 7 ticks, pause
    h.session.resume();
    h.tick(7);
    h.session.pause();

    // Then: second pause equals first pause plus ticks while resumed
    assert_eq!(first_pause, 4);
    assert_eq!(h.session.elapsed_seconds(), first_pause + 7);
    assert_eq!(count(&h.capture.unmute), 1);
    assert_eq!(count(&h.timer.start), 2);
    assert_eq!(count(&h.timer.cancel), 2);
}

/// WHAT: Ticks from a cancelled timer are ignored
/// WHY: A tick may already be queued when pause cancels its timer
#[test]
#[allow(clippy::unwrap_used)]
fn given_tick_from_cancelled_timer_when_delivered_then_ignored() {
    // Given: A session whose first timer was replaced after pause/resume
    let mut h = Harness::new();
    h.session.start().unwrap();
    let old_timer = h.session.active_timer().unwrap();
    h.session.pause();

    // When: The stale tick arrives while paused, and again after resuming
    h.session.on_tick(old_timer);
    h.session.resume();
    h.session.on_tick(old_timer);

    // Then: Neither tick counted
    assert_eq!(h.session.elapsed_seconds(), 0);
    assert_ne!(h.session.active_timer(), Some(old_timer));
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Start,
    Pause,
    Resume,
}

fn expected(status: RecordingStatus, event: Event) -> RecordingStatus {
    match (status, event) {
        (RecordingStatus::Idle, Event::Start) => RecordingStatus::Recording,
        (RecordingStatus::Recording, Event::Pause) => RecordingStatus::Paused,
        (RecordingStatus::Paused, Event::Resume) => RecordingStatus::Recording,
        (status, _) => status,
    }
}

/// WHAT: Every start/pause/resume sequence follows the transition table
/// WHY: Timer implies recording and capture implies active, in all orders
#[test]
#[allow(clippy::unwrap_used)]
fn given_any_event_sequence_when_applied_then_status_and_handles_consistent() {
    let events = [Event::Start, Event::Pause, Event::Resume];

    // Given: Every sequence of length 5 over {start, pause, resume}
    for mut code in 0..3usize.pow(5) {
        let mut h = Harness::new();
        let mut status = RecordingStatus::Idle;

        for _ in 0..5 {
            let event = events[code % 3];
            code /= 3;

            // When: Applying the event
            match event {
                Event::Start => h.session.start().unwrap(),
                Event::Pause => h.session.pause(),
                Event::Resume => h.session.resume(),
            }
            status = expected(status, event);

            // Then: Status matches the fold and resources match the status
            assert_eq!(h.session.status(), status);
            assert_eq!(
                h.session.is_timer_running(),
                status == RecordingStatus::Recording
            );
            assert_eq!(h.session.is_capture_held(), status.is_active());
            assert!(count(&h.timer.running) <= 1);
            assert!(count(&h.capture.held) <= 1);
        }
    }
}

/// WHAT: Scenario: start, 5 ticks, pause, stop shows the save dialog at 0:05
/// WHY: Stop must freeze the recording before asking for a name
#[test]
#[allow(clippy::unwrap_used)]
fn given_five_seconds_recorded_when_stopped_then_save_dialog_shows_elapsed() {
    // Given: start, 5 ticks, pause
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(5);
    h.session.pause();

    // When: Stop
    h.session.request_stop();

    // Then: Save dialog with empty draft, elapsed 0:05, still paused
    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.dialog.kind(), DialogKind::Save);
    assert_eq!(snapshot.dialog.filename_draft(), Some(""));
    assert_eq!(snapshot.elapsed_label(), "0:05");
    assert_eq!(snapshot.status, RecordingStatus::Paused);
}

/// WHAT: Stop while recording auto-pauses first
/// WHY: Audio must not keep flowing while the user types a filename
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_stopped_then_auto_paused_behind_dialog() {
    // Given: A recording session
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(2);

    // When: Stop
    h.session.request_stop();

    // Then: Paused, muted, timer cancelled, save dialog open
    assert_eq!(h.session.status(), RecordingStatus::Paused);
    assert_eq!(count(&h.capture.mute), 1);
    assert!(!h.session.is_timer_running());
    assert_eq!(h.session.dialog().kind(), DialogKind::Save);
    assert_eq!(h.session.elapsed_seconds(), 2);
}

/// WHAT: Scenario: blank filename keeps save disabled and calls no sink
/// WHY: Validation is local and never becomes a user-visible error
#[test]
#[allow(clippy::unwrap_used)]
fn given_blank_filename_when_confirming_save_then_no_request() {
    // Given: Save dialog with a whitespace-only draft
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_stop();
    h.session.edit_filename("   ");

    // When: Confirming
    let request = h.session.confirm_save();

    // Then: Button disabled, no request, nothing frozen, nothing snapshotted
    assert!(!h.session.dialog().can_confirm_save());
    assert!(request.is_none());
    assert!(!h.session.dialog().is_saving());
    assert_eq!(count(&h.capture.snapshot), 0);
}

/// WHAT: Scenario: failed save unfreezes the dialog and keeps the audio
/// WHY: The user must be able to retry without re-recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_sink_failure_when_save_completes_then_dialog_reopens_with_capture_held() {
    // Given: A save in flight
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(3);
    h.session.request_stop();
    h.session.edit_filename("lecture1");
    let request = h.session.confirm_save().unwrap();
    assert!(h.session.dialog().is_saving());
    assert_eq!(request.filename, "lecture1.mp3");

    // When: The sink reports failure
    let result = h.session.complete_save(request.ticket, Err(sink_failure()));

    // Then: Error surfaced, dialog editable again with draft intact, audio kept
    assert!(matches!(result, Err(SessionError::Save { .. })));
    assert_eq!(
        *h.session.dialog(),
        ExitDialog::Save {
            filename_draft: "lecture1".to_string(),
            is_saving: false,
        }
    );
    assert_eq!(h.session.status(), RecordingStatus::Paused);
    assert_eq!(h.session.elapsed_seconds(), 3);
    assert_eq!(count(&h.capture.acquire), 1);
    assert_eq!(count(&h.capture.release), 0);
    assert_eq!(count(&h.closes), 0);
}

/// WHAT: Successful save returns to idle and notifies the embedder
/// WHY: The recording surface may only close once the audio is stored
#[test]
#[allow(clippy::unwrap_used)]
fn given_save_in_flight_when_sink_succeeds_then_idle_and_closed() {
    // Given: A save in flight
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(9);
    h.session.request_stop();
    h.session.edit_filename("Week 3 Notes.MP3");
    let request = h.session.confirm_save().unwrap();
    assert_eq!(request.filename, "Week 3 Notes.MP3");
    assert_eq!(request.artifact.sample_rate, 16_000);

    // When: The sink succeeds
    let finished = h.session.complete_save(request.ticket, Ok(())).unwrap();

    // Then: Idle, resources released once, dialog and draft cleared, closed once
    assert!(finished);
    assert_eq!(h.session.status(), RecordingStatus::Idle);
    assert_eq!(h.session.elapsed_seconds(), 0);
    assert_eq!(*h.session.dialog(), ExitDialog::None);
    assert_eq!(count(&h.capture.release), 1);
    assert!(!h.session.is_capture_held());
    assert_eq!(count(&h.closes), 1);
}

/// WHAT: While saving, cancel, discard, edit and a second confirm are inert
/// WHY: Controls are frozen until the sink answers
#[test]
#[allow(clippy::unwrap_used)]
fn given_save_in_flight_when_user_interacts_then_controls_frozen() {
    // Given: A save in flight
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_stop();
    h.session.edit_filename("lecture1");
    let _request = h.session.confirm_save().unwrap();

    // When: The user tries everything
    h.session.cancel_dialog();
    h.session.edit_filename("other");
    h.session.confirm_discard();
    h.session.request_close();
    h.session.request_stop();
    let second = h.session.confirm_save();

    // Then: Nothing changed
    assert!(second.is_none());
    assert!(!h.session.dialog().can_cancel());
    assert_eq!(
        *h.session.dialog(),
        ExitDialog::Save {
            filename_draft: "lecture1".to_string(),
            is_saving: true,
        }
    );
    assert_eq!(count(&h.capture.release), 0);
    assert_eq!(count(&h.closes), 0);
}

/// WHAT: Scenario: discard from recording releases and closes exactly once
/// WHY: Discard is terminal and must not leak the microphone
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_discard_confirmed_then_released_and_closed_once() {
    // Given: A recording session
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.tick(4);

    // When: Discard confirmed
    h.session.confirm_discard();

    // Then: One release, one cancel, idle, one close
    assert_eq!(count(&h.capture.release), 1);
    assert_eq!(count(&h.timer.cancel), 1);
    assert_eq!(h.session.status(), RecordingStatus::Idle);
    assert_eq!(h.session.elapsed_seconds(), 0);
    assert_eq!(count(&h.closes), 1);

    // And: Dropping the session afterwards releases nothing more
    let Harness {
        session,
        capture,
        timer,
        ..
    } = h;
    drop(session);
    assert_eq!(count(&capture.release), 1);
    assert_eq!(count(&timer.cancel), 1);
}

/// WHAT: Scenario: close while idle closes immediately without a dialog
/// WHY: There is nothing to lose, so no confirmation is needed
#[test]
fn given_idle_session_when_close_requested_then_closed_without_dialog() {
    // Given: An idle session
    let mut h = Harness::new();

    // When: Close requested
    h.session.request_close();

    // Then: Close callback fired once, dialog untouched
    assert_eq!(count(&h.closes), 1);
    assert_eq!(*h.session.dialog(), ExitDialog::None);
    assert_eq!(count(&h.capture.acquire), 0);
}

/// WHAT: Close while recording pauses and escalates through discard
/// WHY: Closing must never silently drop audio
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_close_then_discard_then_idle() {
    // Given: A recording session
    let mut h = Harness::new();
    h.session.start().unwrap();

    // When: Close requested
    h.session.request_close();

    // Then: Auto-paused behind the close dialog, not yet closed
    assert_eq!(h.session.status(), RecordingStatus::Paused);
    assert_eq!(h.session.dialog().kind(), DialogKind::Close);
    assert_eq!(count(&h.closes), 0);

    // When: User opts to discard, then confirms
    h.session.choose_discard();
    assert_eq!(h.session.dialog().kind(), DialogKind::Discard);
    h.session.confirm_discard();

    // Then: Idle and closed
    assert_eq!(h.session.status(), RecordingStatus::Idle);
    assert_eq!(count(&h.closes), 1);
    assert_eq!(count(&h.capture.release), 1);
}

/// WHAT: Close dialog can switch to the save prompt
/// WHY: Users may decide to keep the recording before leaving
#[test]
#[allow(clippy::unwrap_used)]
fn given_close_dialog_when_choosing_save_then_save_prompt_shown() {
    // Given: Close dialog over a paused session
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_close();

    // When: Choosing save
    h.session.choose_save();

    // Then: Save prompt with an empty draft
    assert_eq!(h.session.dialog().filename_draft(), Some(""));
    assert_eq!(h.session.status(), RecordingStatus::Paused);
}

/// WHAT: Cancelling a dialog leaves an auto-paused session paused
/// WHY: Resuming is always an explicit user choice
#[test]
#[allow(clippy::unwrap_used)]
fn given_auto_paused_session_when_dialog_cancelled_then_remains_paused() {
    // Given: Close dialog opened while recording
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_close();

    // When: Cancelling
    h.session.cancel_dialog();

    // Then: No dialog, still paused, capture held, timer stopped
    assert_eq!(*h.session.dialog(), ExitDialog::None);
    assert_eq!(h.session.status(), RecordingStatus::Paused);
    assert!(h.session.is_capture_held());
    assert!(!h.session.is_timer_running());
}

/// WHAT: Resume is ignored while a dialog is open
/// WHY: The dialog freezes the session until the user answers
#[test]
#[allow(clippy::unwrap_used)]
fn given_open_dialog_when_resuming_then_ignored() {
    // Given: Save dialog over a paused session
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_stop();

    // When: Resume
    h.session.resume();

    // Then: Still paused with one timer start ever
    assert_eq!(h.session.status(), RecordingStatus::Paused);
    assert_eq!(count(&h.timer.start), 1);
}

/// WHAT: Teardown at any status releases the capture and cancels timers
/// WHY: No live microphone may outlive the recording surface
#[test]
#[allow(clippy::unwrap_used)]
fn given_any_status_when_session_dropped_then_nothing_left_running() {
    for target in [
        RecordingStatus::Idle,
        RecordingStatus::Recording,
        RecordingStatus::Paused,
    ] {
        // Given: A session in the target status
        let mut h = Harness::new();
        if target.is_active() {
            h.session.start().unwrap();
        }
        if target == RecordingStatus::Paused {
            h.session.pause();
        }
        assert_eq!(h.session.status(), target);

        // When: The session is dropped
        let Harness {
            session,
            capture,
            timer,
            closes,
        } = h;
        drop(session);

        // Then: Nothing held, nothing running, embedder not notified
        assert_eq!(count(&capture.held), 0);
        assert_eq!(count(&timer.running), 0);
        assert_eq!(count(&capture.release), usize::from(target.is_active()));
        assert_eq!(count(&closes), 0);
    }
}

/// WHAT: A save outcome arriving after teardown is dropped
/// WHY: The sink may answer after the surface has been closed
#[test]
#[allow(clippy::unwrap_used)]
fn given_torn_down_session_when_save_completes_then_outcome_ignored() {
    // Given: A save in flight, then teardown
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_stop();
    h.session.edit_filename("lecture1");
    let request = h.session.confirm_save().unwrap();
    h.session.teardown();
    assert!(h.session.is_disposed());
    assert_eq!(count(&h.capture.release), 1);

    // When: The sink answers
    let result = h.session.complete_save(request.ticket, Ok(()));

    // Then: Nothing applied, no close notification, no second release
    assert!(!result.unwrap());
    assert_eq!(count(&h.closes), 0);
    assert_eq!(count(&h.capture.release), 1);

    // And: The disposed session refuses new work
    h.session.start().unwrap();
    assert_eq!(count(&h.capture.acquire), 1);
}

/// WHAT: An outcome for an earlier save attempt is ignored
/// WHY: Only the pending attempt may finish the session
#[test]
#[allow(clippy::unwrap_used)]
fn given_retried_save_when_stale_outcome_arrives_then_ignored() {
    // Given: A failed first attempt and a second attempt in flight
    let mut h = Harness::new();
    h.session.start().unwrap();
    h.session.request_stop();
    h.session.edit_filename("first");
    let first = h.session.confirm_save().unwrap();
    let _ = h.session.complete_save(first.ticket, Err(sink_failure()));
    h.session.edit_filename("second");
    let second = h.session.confirm_save().unwrap();

    // When: The first ticket is reported again
    let stale = h.session.complete_save(first.ticket, Ok(())).unwrap();

    // Then: Ignored, second save still in flight
    assert!(!stale);
    assert!(h.session.dialog().is_saving());
    assert_eq!(count(&h.closes), 0);

    // When: The pending ticket completes
    let finished = h.session.complete_save(second.ticket, Ok(())).unwrap();

    // Then: Session finished
    assert!(finished);
    assert_eq!(h.session.status(), RecordingStatus::Idle);
    assert_eq!(count(&h.closes), 1);
}
