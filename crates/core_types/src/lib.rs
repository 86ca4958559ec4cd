pub type PageId = u64;
pub type RequestId = u64;

/// Identity of one injected answer surface within a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);
