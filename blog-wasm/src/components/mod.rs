pub(crate) mod error_banner;
pub(crate) mod featured_carousel;
pub(crate) mod footer;
pub(crate) mod header;
pub(crate) mod pagination;
pub(crate) mod sidebar;
