mod source;

pub use source::FsImageSource;
