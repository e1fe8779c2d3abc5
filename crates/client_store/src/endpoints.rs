//! Backend paths joined onto the configured base URL.

pub const ACC_ME: &str = "/acc/me";
pub const ACC_FORMS: &str = "/acc/forms";
pub const ACC_TEMPLATES: &str = "/acc/templates";

// Permit annotation surface; consumed by other parts of the product, no
// store issues these requests.
pub const DPAPI_ANNOTATIONS: &str = "/dpapi/annotations/";
pub const DPAPI_POLYGONS: &str = "/dpapi/polygon/";
pub const DPAPI_POINTS: &str = "/dpapi/points/";
