pub(crate) mod quick;
pub(crate) mod validate;
