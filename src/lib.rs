//! Custom resource handlers for AWS Device Farm
//!
//! Provisioning frameworks hand each handler one lifecycle event (Create,
//! Update or Delete) for a project or device pool; the handler validates the
//! desired properties, calls the Device Farm API and returns the resource's
//! identifier and attributes.

pub mod config;
pub mod devicefarm;
pub mod resource;

#[cfg(test)]
mod testing;
