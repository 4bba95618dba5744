pub mod uuids;

pub use uuids::{
    extract_short_uuid, format_uuid_with_name, is_standard_uuid, resolve_characteristic,
    resolve_descriptor, resolve_service, resolve_uuid,
};
