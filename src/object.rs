use std::fmt;

/// Storage class as reported by a metadata lookup. Objects without an
/// explicit class are in the standard tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageClass {
    Standard,
    Glacier,
    DeepArchive,
    Other(String),
}

impl StorageClass {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            None | Some("" | "STANDARD") => StorageClass::Standard,
            Some("GLACIER") => StorageClass::Glacier,
            Some("DEEP_ARCHIVE") => StorageClass::DeepArchive,
            Some(other) => StorageClass::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::Glacier => "GLACIER",
            StorageClass::DeepArchive => "DEEP_ARCHIVE",
            StorageClass::Other(other) => other,
        }
    }

    pub fn is_cold(&self) -> bool {
        matches!(self, StorageClass::Glacier | StorageClass::DeepArchive)
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreMarker {
    Ongoing,
    Completed,
}

impl RestoreMarker {
    /// Parses the `x-amz-restore` header, e.g.
    /// `ongoing-request="false", expiry-date="Fri, 21 Dec 2012 00:00:00 GMT"`.
    pub fn parse(header: Option<&str>) -> Option<Self> {
        let header = header?;
        if header.contains("ongoing-request=\"true\"") {
            Some(RestoreMarker::Ongoing)
        } else if header.contains("ongoing-request=\"false\"") {
            Some(RestoreMarker::Completed)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub storage_class: StorageClass,
    pub restore: Option<RestoreMarker>,
    pub content_length: u64,
}

impl ObjectMetadata {
    pub fn new(storage_class: StorageClass, restore: Option<RestoreMarker>, content_length: u64) -> Self {
        ObjectMetadata {
            storage_class,
            restore,
            content_length,
        }
    }
}

/// Retrieval tier used for a restore request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreTier {
    Standard,
    Bulk,
}

impl RestoreTier {
    pub fn for_class(storage_class: &StorageClass) -> Self {
        match storage_class {
            StorageClass::DeepArchive => RestoreTier::Bulk,
            _ => RestoreTier::Standard,
        }
    }
}

impl fmt::Display for RestoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreTier::Standard => f.write_str("Standard"),
            RestoreTier::Bulk => f.write_str("Bulk"),
        }
    }
}
