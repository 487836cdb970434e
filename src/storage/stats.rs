#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub bytes_downloaded: u64,
    pub head_requests: u64,
    pub restore_requests: u64,
    pub list_requests: u64,
    pub get_requests: u64,
}

impl StorageStats {
    pub fn new() -> Self {
        StorageStats::default()
    }

    pub fn add_head(&mut self) {
        self.head_requests += 1;
    }

    pub fn add_restore(&mut self) {
        self.restore_requests += 1;
    }

    pub fn add_list(&mut self) {
        self.list_requests += 1;
    }

    pub fn add_get(&mut self, size: u64) {
        self.get_requests += 1;
        self.bytes_downloaded += size;
    }
}
