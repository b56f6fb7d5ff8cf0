//! Object Storage Gateway contract
//!
//! Product images live in an external bucket addressed by public URL. This
//! module defines what the domain needs from that bucket; infrastructure
//! provides the concrete client.

mod keys;
mod mock;
mod traits;


pub use keys::{generate_object_key, object_key_from_url};
pub use mock::MockObjectStorage;
pub use traits::{ImageUpload, ObjectStorage, UploadedImage};
