// Machine-facing side of the pipeline: traits are the contract, the rest are
// the local implementations.

pub mod traits;    // Toolchain + ArtifactStore contracts
pub mod toolchain; // cargo process spawn
pub mod store;     // tokio filesystem
