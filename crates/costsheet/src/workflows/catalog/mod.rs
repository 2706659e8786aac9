//! Read-only access to the project and inventory catalog.

pub mod client;
pub mod handoff;
pub mod inventory;
pub mod projects;
pub mod record;

pub use client::{Catalog, CatalogClient, CatalogEndpoint, CatalogError, CatalogSnapshot};
pub use handoff::{HandoffStore, UnitRoute};
pub use inventory::{available_units, export_row, search_units, InventoryUnit};
pub use projects::{find_project, sorted_projects, ProjectAttribute, ProjectCard, ProjectDetail};
pub use record::{keys, records_from_csv, CatalogRecord};
