//! Tenant scope types consumed by the key builders.
//!
//! A scope is the (organization, project, environment) triple every queue key
//! is addressed under. Callers arrive with one of two shapes: a live
//! environment object resolved by the tenant resolver (with its owning
//! organization and project nested inside), or a flat descriptor carrying
//! just the three ids. [`EnvScope`] is the sum of the two, and every key
//! builder accepts either, producing the identical key for both.

use serde::{Deserialize, Serialize};

/// Organization portion of an authenticated environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
}

/// Project portion of an authenticated environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
}

/// A resolver-supplied environment together with its owning organization and
/// project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedEnvironment {
    /// The environment id itself.
    pub id: String,
    pub organization: Organization,
    pub project: Project,
}

/// Flat record of the same three identifiers, for callers that only have ids
/// in hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvDescriptor {
    pub org_id: String,
    pub project_id: String,
    pub env_id: String,
}

/// Either input shape a key builder accepts where a tenant scope is required.
///
/// Both variants resolve to the same identifiers, so a call site can pass
/// whichever it has without the composed key changing. Builders take
/// `impl Into<EnvScope<'_>>` and dispatch on the variant here rather than
/// probing fields.
#[derive(Clone, Copy, Debug)]
pub enum EnvScope<'a> {
    Environment(&'a AuthenticatedEnvironment),
    Descriptor(&'a EnvDescriptor),
}

impl<'a> EnvScope<'a> {
    pub fn org_id(&self) -> &'a str {
        match self {
            EnvScope::Environment(env) => &env.organization.id,
            EnvScope::Descriptor(descriptor) => &descriptor.org_id,
        }
    }

    pub fn project_id(&self) -> &'a str {
        match self {
            EnvScope::Environment(env) => &env.project.id,
            EnvScope::Descriptor(descriptor) => &descriptor.project_id,
        }
    }

    pub fn env_id(&self) -> &'a str {
        match self {
            EnvScope::Environment(env) => &env.id,
            EnvScope::Descriptor(descriptor) => &descriptor.env_id,
        }
    }
}

impl<'a> From<&'a AuthenticatedEnvironment> for EnvScope<'a> {
    fn from(env: &'a AuthenticatedEnvironment) -> Self {
        EnvScope::Environment(env)
    }
}

impl<'a> From<&'a EnvDescriptor> for EnvScope<'a> {
    fn from(descriptor: &'a EnvDescriptor) -> Self {
        EnvScope::Descriptor(descriptor)
    }
}

impl From<&AuthenticatedEnvironment> for EnvDescriptor {
    fn from(env: &AuthenticatedEnvironment) -> Self {
        EnvDescriptor {
            org_id: env.organization.id.clone(),
            project_id: env.project.id.clone(),
            env_id: env.id.clone(),
        }
    }
}
