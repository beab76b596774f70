//! The vault feature slice.
//!
//! Everything between the cryptographic core and the UI: durable vault and
//! settings stores, the session state machine, the daily consumption-decay
//! engine, one-shot session recovery, and import/export.
//!
//! ## Layout
//!
//! * [`store`] — [`VaultStore`] (postcard records in the `vaults` namespace)
//!   and [`SettingsStore`] (flat JSON map in the `settings` namespace).
//! * [`session`] — [`VaultSession`], the `Locked -> Unlocking -> Unlocked`
//!   state machine owning the open vault's key and plaintext.
//! * [`decay`] — the pure daily-consumption function.
//! * [`recovery`] — [`RecoveryStore`] for one-shot re-unlock after a reload.
//! * [`transfer`] — JSON export/import with validate-before-write.

mod error;

pub mod decay;
pub mod record;
pub mod recovery;
pub mod session;
pub mod store;
pub mod transfer;

pub use decay::{DecayOutcome, apply_decay};
pub use error::{Result, VaultsError, VaultsErrorExt};
pub use record::{KeyParams, VaultMetadata, VaultRecord};
pub use recovery::{RecoveryStore, RecoveryTicket};
pub use session::VaultSession;
pub use store::{SettingsStore, VaultStore};
pub use transfer::{
    ExportDocument, ExportFile, ImportPreview, ImportStats, apply_import, export_file_name,
    prepare_export, process_import,
};

pub mod prelude {
    pub use crate::decay::{DecayOutcome, apply_decay};
    pub use crate::error::{Result, VaultsError, VaultsErrorExt};
    pub use crate::record::{KeyParams, VaultMetadata, VaultRecord};
    pub use crate::recovery::{RecoveryStore, RecoveryTicket};
    pub use crate::session::VaultSession;
    pub use crate::store::{SettingsStore, VaultStore};
    pub use crate::transfer::{apply_import, prepare_export, process_import};
}
