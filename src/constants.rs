pub mod header_constants {
    pub const FIXED_HEADER_SIZE: usize = 80;
    pub const HASH_SIZE: usize = 32;
    pub const MAX_HEADERS: u64 = 2000;
}

pub mod commands {
    pub const HEADERS: &str = "headers";
}

pub mod config {
    pub const VERBOSE: &str = "verbose";
    pub const QUIET: &str = "quiet";
}
