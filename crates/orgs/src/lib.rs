//! `stoa-orgs` — organization documents and the company↔customer link.
//!
//! A company account owns at most one organization; customers attach to
//! organizations either by company-initiated direct add or by presenting the
//! organization's join code. Both paths converge on the same pair of
//! add-to-set writes.

pub mod association;
pub mod company;
pub mod service;
pub mod store;

pub use association::{AssociationOutcome, AssociationService};
pub use company::{Company, CompanyStore, JoinCode};
pub use service::{CompanyUpdate, CreateCompany, OrgService};
pub use store::InMemoryCompanyStore;
