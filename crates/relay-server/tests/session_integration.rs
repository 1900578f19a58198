//! Integration tests for the relay server's session handling.
//!
//! # Purpose
//!
//! These tests exercise the server through its *public* API the same way
//! `main()` wires it together: [`network::bind`] plus [`network::run_server`]
//! with a shared [`ReplayInputUseCase`] over a [`RecordingInjector`].  Test
//! agents are plain Tokio TCP clients writing frames produced by the real
//! codec.  They verify:
//!
//! - The happy path: frames sent by an agent are decoded, scaled to the
//!   server's screen, and injected in order.
//! - Stream reassembly: a frame delivered one byte at a time is still decoded
//!   exactly once.
//! - Concurrency: events from two simultaneous agents are all injected.
//! - Isolation: a malformed frame closes only the offending session; other
//!   agents keep replaying.
//!
//! # Test topology
//!
//! ```text
//! test TCP client(s) ── encode_event() frames ──► run_server
//!                                                    └─ session task(s)
//!                                                         └─ ReplayInputUseCase
//!                                                              └─ RecordingInjector
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use relay_core::{encode_event, InputEvent, MouseButton, ScreenGeometry};
use relay_server::application::replay_input::ReplayInputUseCase;
use relay_server::infrastructure::injection::mock::{InjectedCall, RecordingInjector};
use relay_server::infrastructure::network;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Starts a server on an ephemeral port with the given replay screen.
///
/// Returns the address test agents should connect to and the injector to
/// assert against.  The listener task runs until the test ends.
async fn start_server(screen: ScreenGeometry) -> (SocketAddr, Arc<RecordingInjector>) {
    let injector = Arc::new(RecordingInjector::new());
    let use_case = Arc::new(Mutex::new(ReplayInputUseCase::new(
        Arc::clone(&injector) as _,
        screen,
    )));

    let listener = network::bind("127.0.0.1:0".parse().unwrap())
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(network::run_server(listener, use_case));
    (addr, injector)
}

/// Polls the injector until it has recorded `expected` calls, or panics
/// after two seconds.
async fn wait_for_calls(injector: &RecordingInjector, expected: usize) -> Vec<InjectedCall> {
    for _ in 0..200 {
        let calls = injector.calls();
        if calls.len() >= expected {
            return calls;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "timed out waiting for {expected} injected call(s); got {:?}",
        injector.calls()
    );
}

// ── Happy path ────────────────────────────────────────────────────────────────

/// One agent sends a burst of events; all of them must be injected in
/// order, with the mouse position scaled to the server's screen.
#[tokio::test]
async fn test_agent_events_are_replayed_in_order_and_scaled() {
    // Arrange: the server replays onto a 2560x1440 screen.
    let (addr, injector) = start_server(ScreenGeometry::new(2560, 1440)).await;
    let mut agent = TcpStream::connect(addr).await.expect("connect");

    // Act: the sender's screen center, a click, a keystroke.
    for event in [
        InputEvent::MouseMove { x: 0.5, y: 0.5 },
        InputEvent::MouseClick {
            button: MouseButton::Left,
            pressed: true,
        },
        InputEvent::Key {
            key: "a".to_string(),
            pressed: true,
        },
    ] {
        let frame = encode_event(&event).expect("encode");
        agent.write_all(&frame).await.expect("write");
    }

    // Assert
    let calls = wait_for_calls(&injector, 3).await;
    assert_eq!(
        calls,
        vec![
            InjectedCall::MouseMove { x: 1280, y: 720 },
            InjectedCall::MouseButton {
                button: MouseButton::Left,
                pressed: true
            },
            InjectedCall::Key {
                key: "a".to_string(),
                pressed: true
            },
        ]
    );
}

/// A frame dribbled one byte at a time must still decode exactly once:
/// TCP gives no write-boundary guarantees and the session buffer has to
/// reassemble.
#[tokio::test]
async fn test_frame_split_across_many_writes_is_reassembled() {
    // Arrange
    let (addr, injector) = start_server(ScreenGeometry::new(1920, 1080)).await;
    let mut agent = TcpStream::connect(addr).await.expect("connect");
    let frame = encode_event(&InputEvent::MouseScroll { dx: 0, dy: -7 }).expect("encode");

    // Act: one byte per write, with a flush between each.
    for byte in &frame {
        agent.write_all(&[*byte]).await.expect("write");
        agent.flush().await.expect("flush");
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // Assert
    let calls = wait_for_calls(&injector, 1).await;
    assert_eq!(calls, vec![InjectedCall::MouseScroll { dx: 0, dy: -7 }]);
}

/// Duplicate consecutive positions must each be injected; the server does
/// not coalesce.
#[tokio::test]
async fn test_repeated_identical_events_are_each_injected() {
    // Arrange
    let (addr, injector) = start_server(ScreenGeometry::new(1920, 1080)).await;
    let mut agent = TcpStream::connect(addr).await.expect("connect");
    let frame = encode_event(&InputEvent::MouseMove { x: 0.5, y: 0.5 }).expect("encode");

    // Act
    for _ in 0..3 {
        agent.write_all(&frame).await.expect("write");
    }

    // Assert
    let calls = wait_for_calls(&injector, 3).await;
    assert_eq!(calls.len(), 3);
}

// ── Multiple agents ───────────────────────────────────────────────────────────

/// Two agents connected at once: every event from both must be injected.
#[tokio::test]
async fn test_two_agents_events_are_all_injected() {
    // Arrange
    let (addr, injector) = start_server(ScreenGeometry::new(1920, 1080)).await;
    let mut first = TcpStream::connect(addr).await.expect("connect first");
    let mut second = TcpStream::connect(addr).await.expect("connect second");

    // Act: one agent types, the other scrolls.
    let frame_a = encode_event(&InputEvent::Key {
        key: "a".to_string(),
        pressed: true,
    })
    .expect("encode");
    let frame_b = encode_event(&InputEvent::MouseScroll { dx: 0, dy: -5 }).expect("encode");
    first.write_all(&frame_a).await.expect("write first");
    second.write_all(&frame_b).await.expect("write second");

    // Assert: both events arrive (inter-agent order is unspecified).
    let calls = wait_for_calls(&injector, 2).await;
    assert_eq!(calls.len(), 2);
    assert!(calls.contains(&InjectedCall::Key {
        key: "a".to_string(),
        pressed: true
    }));
    assert!(calls.contains(&InjectedCall::MouseScroll { dx: 0, dy: -5 }));
}

// ── Session isolation ─────────────────────────────────────────────────────────

/// A malformed frame closes only the offending session.  An agent connected
/// afterwards (and any other live session) keeps working.
#[tokio::test]
async fn test_malformed_frame_closes_only_that_session() {
    // Arrange
    let (addr, injector) = start_server(ScreenGeometry::new(1920, 1080)).await;

    // A rogue agent sends a frame with a bogus protocol version.
    let mut rogue = TcpStream::connect(addr).await.expect("connect rogue");
    rogue
        .write_all(&[0x7F, 0x01, 0x00, 0x00])
        .await
        .expect("write garbage");

    // A healthy agent connects and sends a valid event.
    let mut healthy = TcpStream::connect(addr).await.expect("connect healthy");
    let frame = encode_event(&InputEvent::MouseScroll { dx: 1, dy: 1 }).expect("encode");
    healthy.write_all(&frame).await.expect("write");

    // Assert: the valid event is injected; the garbage never is.
    let calls = wait_for_calls(&injector, 1).await;
    assert_eq!(calls, vec![InjectedCall::MouseScroll { dx: 1, dy: 1 }]);
}
