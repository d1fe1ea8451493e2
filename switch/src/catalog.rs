//! Prefix matchers over the model and carrier catalogs

use crate::models::policy::{CarrierPolicy, ModelPolicy};

/// Find the model policy for a device model string
///
/// Policies match by name prefix. When several entries match, the last one
/// in catalog order wins.
pub fn match_model<'a>(model: &str, catalog: &'a [ModelPolicy]) -> Option<&'a ModelPolicy> {
    catalog
        .iter()
        .rev()
        .find(|policy| model.starts_with(&policy.name))
}

/// Find the carrier policy for an ICCID
///
/// Carriers match by ICCID prefix. When several entries match, the first one
/// in catalog order wins.
pub fn match_carrier<'a>(iccid: &str, catalog: &'a [CarrierPolicy]) -> Option<&'a CarrierPolicy> {
    catalog
        .iter()
        .find(|policy| iccid.starts_with(&policy.iccid_prefix))
}
