//! Integration tests for the runtime facade.
//!
//! These exercise the primitives the playback controller leans on: spawned
//! tasks, paused-clock timers, mailbox ordering and cancellation.

use core_async::{sync, task, time};

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test(start_paused = true)]
async fn test_instant_follows_paused_clock() {
    let start = time::Instant::now();
    time::sleep(time::Duration::from_secs(3)).await;
    assert_eq!(start.elapsed(), time::Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_interval_ticks_at_period() {
    let mut interval = time::interval(time::Duration::from_millis(250));
    let start = time::Instant::now();

    // First tick completes immediately.
    interval.tick().await;
    for _ in 0..4 {
        interval.tick().await;
    }

    assert_eq!(start.elapsed(), time::Duration::from_millis(1000));
}

#[tokio::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(200)).await;
    })
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_mpsc_preserves_send_order() {
    let (tx, mut rx) = sync::mpsc::unbounded_channel();
    for i in 0..100 {
        tx.send(i).unwrap();
    }
    drop(tx);

    let mut received = Vec::new();
    while let Some(value) = rx.recv().await {
        received.push(value);
    }
    assert_eq!(received, (0..100).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_token_stops_loop() {
    let token = sync::CancellationToken::new();
    let child = token.clone();
    let (tx, mut rx) = sync::mpsc::unbounded_channel();

    let handle = task::spawn(async move {
        let mut interval = time::interval(time::Duration::from_millis(100));
        loop {
            tokio::select! {
                _ = child.cancelled() => break,
                _ = interval.tick() => {
                    if tx.send(()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    time::sleep(time::Duration::from_millis(350)).await;
    token.cancel();
    handle.await.unwrap();

    let mut ticks = 0;
    while rx.try_recv().is_ok() {
        ticks += 1;
    }
    assert_eq!(ticks, 4);
}

#[test]
fn test_duration_from_secs_f64() {
    assert_eq!(
        time::duration_from_secs_f64(1.5),
        Some(time::Duration::from_millis(1500))
    );
    assert_eq!(time::duration_from_secs_f64(0.0), Some(time::Duration::ZERO));
    assert_eq!(time::duration_from_secs_f64(-1.0), None);
    assert_eq!(time::duration_from_secs_f64(f64::NAN), None);
    assert_eq!(time::duration_from_secs_f64(f64::INFINITY), None);
}

#[test]
fn test_block_on_outside_runtime() {
    assert!(!core_async::runtime::in_runtime());
    let value = core_async::runtime::block_on(async { 7 });
    assert_eq!(value, 7);
}
