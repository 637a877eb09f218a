/// Turns local ids into fully-qualified resource names.
#[cfg_attr(test, mockall::automock)]
pub trait ResourcePathResolver {
    fn conversion_action_path(&self, customer_id: &str, conversion_action_id: &str) -> String;
}

pub fn conversion_action_path(
    customer_id: impl AsRef<str>,
    conversion_action_id: impl AsRef<str>,
) -> String {
    format!(
        "customers/{}/conversionActions/{}",
        customer_id.as_ref(),
        conversion_action_id.as_ref()
    )
}

//
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceNames;

impl ResourcePathResolver for ResourceNames {
    fn conversion_action_path(&self, customer_id: &str, conversion_action_id: &str) -> String {
        conversion_action_path(customer_id, conversion_action_id)
    }
}
