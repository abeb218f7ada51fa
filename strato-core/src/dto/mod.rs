//! DTOs for the cloud function task API
//!
//! Wire objects in the provider's camelCase schema. Unknown response fields
//! are ignored for forward compatibility; required fields missing on a 2xx
//! response surface as a parse error in the client.

pub mod task;
