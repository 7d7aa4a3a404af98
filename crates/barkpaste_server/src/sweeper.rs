//! Background task that periodically removes expired regular pastes.

use barkpaste_core::PasteService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run one sweep on the blocking pool.
///
/// # Returns
/// Number of removed pastes, or `None` when the sweep failed (already logged).
pub async fn sweep_once(service: Arc<PasteService>) -> Option<usize> {
    match tokio::task::spawn_blocking(move || service.clean_expired()).await {
        Ok(Ok(removed)) => {
            tracing::debug!(removed, "Expiry sweep finished");
            Some(removed)
        }
        Ok(Err(err)) => {
            tracing::error!("Expiry sweep failed: {}", err);
            None
        }
        Err(err) => {
            tracing::error!("Expiry sweep task did not complete: {}", err);
            None
        }
    }
}

/// Spawn a task that sweeps every `period` until aborted.
///
/// The first sweep runs immediately.
pub fn spawn_sweeper(service: Arc<PasteService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep_once(service.clone()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkpaste_core::{
        models::token::Token, Database, ManualClock, PasteStore, ServiceOptions, TokenStore,
    };
    use chrono::{TimeZone, Utc};

    fn service_with_clock() -> (Database, Arc<ManualClock>, Arc<PasteService>) {
        let db = Database::in_memory().expect("db");
        db.tokens.create(&Token::new("tok")).expect("token");
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let service = PasteService::new(
            db.paste_store(),
            db.token_store(),
            ServiceOptions::default(),
        )
        .with_clock(clock.clone());
        (db, clock, Arc::new(service))
    }

    #[tokio::test]
    async fn sweep_once_reports_removed_count() {
        let (db, clock, service) = service_with_clock();
        service
            .create_regular("", b"short".to_vec(), chrono::Duration::seconds(5))
            .unwrap();
        service
            .create_persistent("tok", "doc", b"keep".to_vec(), chrono::Duration::seconds(5))
            .unwrap();

        assert_eq!(sweep_once(service.clone()).await, Some(0));
        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(sweep_once(service.clone()).await, Some(1));
        assert_eq!(db.pastes.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn spawned_sweeper_removes_expired_pastes_until_aborted() {
        let (db, clock, service) = service_with_clock();
        service
            .create_regular("", b"short".to_vec(), chrono::Duration::seconds(5))
            .unwrap();
        clock.advance(chrono::Duration::seconds(10));

        let handle = spawn_sweeper(service, Duration::from_millis(10));
        let mut remaining = db.pastes.list().unwrap().len();
        for _ in 0..100 {
            if remaining == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            remaining = db.pastes.list().unwrap().len();
        }
        handle.abort();
        assert_eq!(remaining, 0);
    }
}
