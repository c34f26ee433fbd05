//! Ctrl-C handling for long batches: the first interrupt asks the batch to
//! stop after the current contact, the second one quits.

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

/// Exit status used when the user quits with a second interrupt.
pub const FORCE_QUIT_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// A second interrupt arrived; the process should exit now.
    ForceQuit,
    /// The signal source went away before a second interrupt.
    SourceClosed,
}

/// Consumes interrupt notifications until the second one or until the
/// sender is dropped. The first notification cancels `token`.
pub async fn watch_interrupts(
    mut signals: UnboundedReceiver<()>,
    token: CancellationToken,
) -> InterruptOutcome {
    if signals.recv().await.is_none() {
        return InterruptOutcome::SourceClosed;
    }
    token.cancel();
    tracing::warn!("🛑 Interrupt received, stopping after the current contact");
    eprintln!("🛑 Stopping after the current contact. Press Ctrl-C again to quit now.");

    match signals.recv().await {
        Some(()) => {
            tracing::warn!("🛑 Second interrupt received, quitting");
            InterruptOutcome::ForceQuit
        }
        None => InterruptOutcome::SourceClosed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn test_second_interrupt_forces_quit() {
        let (tx, rx) = unbounded_channel();
        let token = CancellationToken::new();
        tx.send(()).unwrap();
        tx.send(()).unwrap();

        let outcome = watch_interrupts(rx, token.clone()).await;

        assert_eq!(outcome, InterruptOutcome::ForceQuit);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_first_interrupt_only_cancels() {
        let (tx, rx) = unbounded_channel();
        let token = CancellationToken::new();
        let watcher = tokio::spawn(watch_interrupts(rx, token.clone()));

        tx.send(()).unwrap();
        token.cancelled().await;
        assert!(!watcher.is_finished());

        drop(tx);
        assert_eq!(watcher.await.unwrap(), InterruptOutcome::SourceClosed);
    }

    #[tokio::test]
    async fn test_closed_source_leaves_token_alone() {
        let (tx, rx) = unbounded_channel::<()>();
        let token = CancellationToken::new();
        drop(tx);

        let outcome = watch_interrupts(rx, token.clone()).await;

        assert_eq!(outcome, InterruptOutcome::SourceClosed);
        assert!(!token.is_cancelled());
    }
}
