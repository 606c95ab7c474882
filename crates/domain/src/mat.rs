use crate::DomainError;

/// Channel layout of an [`ImageMat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Rgba,
    Rgb,
    /// 8-bit HSV: hue in `0..180`, saturation and value in `0..=255`.
    Hsv,
    Gray,
}

impl ColorSpace {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgba => 4,
            Self::Rgb | Self::Hsv => 3,
            Self::Gray => 1,
        }
    }
}

/// Interleaved 8-bit working buffer handed between vision backend primitives.
///
/// Each primitive produces a fresh `ImageMat`, so an intermediate is freed as soon
/// as the stage that created it lets go of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMat {
    rows: u32,
    cols: u32,
    space: ColorSpace,
    data: Vec<u8>,
}

impl ImageMat {
    pub fn new(rows: u32, cols: u32, space: ColorSpace, data: Vec<u8>) -> Result<Self, DomainError> {
        if rows == 0 || cols == 0 {
            return Err(DomainError::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let expected = rows as usize * cols as usize * space.channels();
        if data.len() != expected {
            return Err(DomainError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            space,
            data,
        })
    }

    pub fn filled(rows: u32, cols: u32, space: ColorSpace, value: u8) -> Result<Self, DomainError> {
        let len = rows as usize * cols as usize * space.channels();
        Self::new(rows, cols, space, vec![value; len])
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn channels(&self) -> usize {
        self.space.channels()
    }

    pub fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
