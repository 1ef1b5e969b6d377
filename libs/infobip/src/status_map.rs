//! Infobip delivery-report group names mapped onto engine statuses.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use sms_core::{MsgStatusValue, ReceiveError};

/// Group names Infobip reports in delivery callbacks.
pub const GROUP_NAMES: [&str; 5] = ["PENDING", "DELIVERED", "EXPIRED", "REJECTED", "UNDELIVERABLE"];

static STATUS_MAPPING: Lazy<HashMap<&'static str, MsgStatusValue>> = Lazy::new(|| {
    HashMap::from([
        ("PENDING", MsgStatusValue::Sent),
        ("EXPIRED", MsgStatusValue::Sent),
        ("DELIVERED", MsgStatusValue::Delivered),
        ("REJECTED", MsgStatusValue::Failed),
        ("UNDELIVERABLE", MsgStatusValue::Failed),
    ])
});

/// Looks up `group_name` (case-sensitive). `None` means the name is not part of the vocabulary.
///
/// ```
/// use sms_core::MsgStatusValue;
/// use sms_infobip::status_map::map_group_name;
///
/// assert_eq!(map_group_name("DELIVERED"), Some(MsgStatusValue::Delivered));
/// assert_eq!(map_group_name("delivered"), None);
/// ```
pub fn map_group_name(group_name: &str) -> Option<MsgStatusValue> {
    STATUS_MAPPING.get(group_name).copied()
}

pub fn unknown_status(group_name: &str) -> ReceiveError {
    ReceiveError::UnknownStatus(format!(
        "unknown status '{group_name}', must be one of PENDING, DELIVERED, EXPIRED, REJECTED or UNDELIVERABLE"
    ))
}
