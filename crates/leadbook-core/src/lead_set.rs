//! Organization-scoped lead collections

use crate::error::{Error, Result};
use crate::models::Lead;

/// The leads of exactly one organization.
///
/// Analytics only ever run over a `LeadSet`, so a collection mixing tenants
/// cannot reach the scoring or insight code.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSet {
    organization_id: i64,
    leads: Vec<Lead>,
}

impl LeadSet {
    /// Build a set, rejecting any lead owned by a different organization
    pub fn for_organization(organization_id: i64, leads: Vec<Lead>) -> Result<Self> {
        if let Some(stray) = leads
            .iter()
            .find(|lead| lead.organization_id != organization_id)
        {
            return Err(Error::InvalidData(format!(
                "Lead {} belongs to organization {}, not {}",
                stray.id, stray.organization_id, organization_id
            )));
        }

        Ok(Self {
            organization_id,
            leads,
        })
    }

    /// Empty set for an organization with no leads
    pub fn empty(organization_id: i64) -> Self {
        Self {
            organization_id,
            leads: Vec::new(),
        }
    }

    pub fn organization_id(&self) -> i64 {
        self.organization_id
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lead> {
        self.leads.iter()
    }
}

impl<'a> IntoIterator for &'a LeadSet {
    type Item = &'a Lead;
    type IntoIter = std::slice::Iter<'a, Lead>;

    fn into_iter(self) -> Self::IntoIter {
        self.leads.iter()
    }
}
