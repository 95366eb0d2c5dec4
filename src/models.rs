use std::path::PathBuf;

/// Title and description produced by Gemini for a set of photos.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
}

/// Everything needed to create an eBay draft listing.
#[derive(Debug, Clone)]
pub struct DraftListing {
    pub title: String,
    pub description: String,
    pub photo_paths: Vec<PathBuf>,
}
