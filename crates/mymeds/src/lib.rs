//! Facade crate for the MyMeds vault subsystem.
//! Re-exports the layer crates and aggregates their initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `mymeds` and call [`init`] with the durable data directory and a
//!   runtime (temp-scoped) directory.
//! - Drive everything through the returned [`App`]: the vault session, the
//!   settings store, and the recovery store.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = mymeds::init("/var/lib/mymeds", "/tmp/mymeds-runtime").await?;
//!
//! let today = chrono::Utc::now().date_naive();
//! let meta = app.session.create("Home", "correct-horse", today).await?;
//! app.session.unlock(&meta.id, "correct-horse", today).await?;
//! # Ok(())
//! # }
//! ```

pub use mymeds_domain as domain;
pub use mymeds_logger as logger;
pub use mymeds_storage as storage;
pub use mymeds_vault as vault;
pub use mymeds_vaults as vaults;

pub use mymeds_vaults::{RecoveryStore, SettingsStore, VaultSession, VaultStore, VaultsError};

use mymeds_storage::{Compression, Storage};
use std::path::Path;

/// The composed application root.
///
/// One per process: the session is the single writer to the vault store.
#[derive(Debug)]
pub struct App {
    pub session: VaultSession,
    pub settings: SettingsStore,
    pub recovery: RecoveryStore,
}

/// Initializes the storage engines and wires up the feature slice.
///
/// `data_dir` is the durable root (vault records, settings); `runtime_dir`
/// holds only the process-session-scoped recovery ticket and should live in
/// a temp location the platform clears.
///
/// # Errors
/// Any failure here is an initialization failure: the application cannot
/// persist anything and should show a diagnostic instead of running
/// partially.
pub async fn init(
    data_dir: impl AsRef<Path>,
    runtime_dir: impl AsRef<Path>,
) -> Result<App, Box<dyn std::error::Error>> {
    let data = Storage::builder()
        .root(data_dir.as_ref())
        .create(true)
        .compression(Compression::Lz4)
        .connect()
        .await?;

    let runtime = Storage::builder().root(runtime_dir.as_ref()).create(true).connect().await?;

    let session = VaultSession::new(VaultStore::new(&data)?);
    let settings = SettingsStore::new(&data)?;
    let recovery = RecoveryStore::new(&runtime)?;

    Ok(App { session, settings, recovery })
}

/// Attempts the one-shot automatic re-unlock after an unexpected reload.
///
/// Reads and clears the recovery ticket in one step, then tries to unlock
/// with it. A missing ticket, a stale id, or a changed password all resolve
/// to "no vault open" without error; recovery is best-effort by design.
pub async fn try_recover(app: &mut App, today: chrono::NaiveDate) -> bool {
    let Ok(Some(ticket)) = app.recovery.take().await else {
        return false;
    };

    app.session.unlock(&ticket.vault_id, &ticket.password, today).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mymeds_vaults::RecoveryTicket;

    #[tokio::test]
    async fn init_composes_all_layers() {
        let temp = tempfile::TempDir::new().unwrap();
        let app = init(temp.path().join("data"), temp.path().join("runtime")).await.unwrap();

        assert!(!app.session.is_unlocked());
        assert!(app.settings.load().await.unwrap().show_overview);
    }

    #[tokio::test]
    async fn recovery_reopens_the_vault_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let data = temp.path().join("data");
        let runtime = temp.path().join("runtime");
        let today = chrono::Utc::now().date_naive();

        let mut app = init(&data, &runtime).await.unwrap();
        let meta = app.session.create("Home", "pw", today).await.unwrap();
        app.recovery
            .save(&RecoveryTicket { vault_id: meta.id.clone(), password: "pw".to_owned() })
            .await
            .unwrap();

        // Simulated reload: fresh composition over the same directories.
        let mut app = init(&data, &runtime).await.unwrap();
        assert!(try_recover(&mut app, today).await);
        assert_eq!(app.session.current_id(), Some(meta.id.as_str()));

        // The ticket was consumed; a second reload stays locked.
        let mut app = init(&data, &runtime).await.unwrap();
        assert!(!try_recover(&mut app, today).await);
        assert!(!app.session.is_unlocked());
    }
}
