//! Domain data types

pub mod request;
pub mod resources;

pub use request::{
    ApiResponse, HttpMethod, MultipartField, MultipartPart, RequestBody, RequestDescriptor,
    ResponseSnapshot, DEFAULT_REQUEST_TIMEOUT,
};
pub use resources::{
    Brand, BrandDraft, BrandPatch, Meeting, MeetingDraft, MeetingPatch, Product, ProductDraft,
    ProductPatch, TeamMember, TeamMemberDraft, TeamMemberPatch,
};
