//! SRTM/NASADEM 1 arc-second elevation (`.hgt`) tiles.
//!
//! # References
//!
//! 1. [30-Meter SRTM Tile Downloader](https://dwtkns.com/srtm30m)
//! 1. [Archive Team](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

use crate::{DemError, Interval1D, Interval2D, SAMPLES_PER_DEGREE};
use byteorder::{BigEndian as BE, ByteOrder, ReadBytesExt};
use geo::geometry::Coord;
use log::debug;
use memmap2::Mmap;
use std::{
    fs::File,
    io::BufReader,
    mem::size_of,
    path::Path,
    sync::atomic::{AtomicI16, Ordering},
};

/// Samples per tile row (and column). Edges are shared with
/// neighboring tiles.
pub const SAMPLES_PER_ROW: usize = SAMPLES_PER_DEGREE as usize + 1;

/// Total number of samples in a tile.
pub const SAMPLES_PER_TILE: usize = SAMPLES_PER_ROW * SAMPLES_PER_ROW;

/// Exact size, in bytes, of a valid tile file.
pub const HGT_FILE_LEN: u64 = (SAMPLES_PER_TILE * size_of::<i16>()) as u64;

/// How to load a tile.
///
/// The trade off between loading tile data into memory versus memory
/// mapping is not obvious, and you should measure both before
/// deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileMode {
    /// Parse tile and load into memory.
    ///
    /// Note that this consumes ~26MB of RAM per tile.
    InMem,

    /// Memory map file contents.
    #[default]
    MemMap,
}

/// A 1°×1° tile of elevation samples.
pub struct HgtTile {
    /// Southwest corner of the tile, in whole degrees.
    sw_corner: Coord<i16>,

    /// Sample indices covered by this tile.
    extent: Interval2D,

    /// Lowest elevation sample in this tile.
    min_elevation: AtomicI16,

    /// Highest elevation sample in this tile.
    max_elevation: AtomicI16,

    /// Elevation samples, row-major from the north-west corner.
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[i16]>),
    MemMap(Mmap),
}

impl SampleStore {
    fn get_unchecked(&self, index: usize) -> i16 {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw) => {
                let start = index * size_of::<i16>();
                BE::read_i16(&raw[start..start + size_of::<i16>()])
            }
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = i16> + '_> {
        match self {
            Self::InMem(samples) => Box::new(samples.iter().copied()),
            Self::MemMap(raw) => Box::new(raw.chunks_exact(2).map(BE::read_i16)),
        }
    }
}

impl HgtTile {
    /// Opens the tile at `path` according to `mode`.
    pub fn open<P: AsRef<Path>>(path: P, mode: TileMode) -> Result<Self, DemError> {
        match mode {
            TileMode::InMem => Self::load(path),
            TileMode::MemMap => Self::memmap(path),
        }
    }

    /// Returns a tile read into memory from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let sw_corner = parse_sw_corner(&path)?;
        check_len(&path)?;
        debug!("loading {:?}", path.as_ref());

        let mut file = BufReader::new(File::open(&path)?);
        let mut samples = vec![0_i16; SAMPLES_PER_TILE];
        file.read_i16_into::<BE>(&mut samples)?;

        Ok(Self::with_store(
            sw_corner,
            SampleStore::InMem(samples.into_boxed_slice()),
        ))
    }

    /// Returns a tile using the memory-mapped file as storage.
    ///
    /// The mapping is released when the tile is dropped.
    pub fn memmap<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let sw_corner = parse_sw_corner(&path)?;
        check_len(&path)?;
        debug!("mapping {:?}", path.as_ref());

        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        if mmap.len() as u64 != HGT_FILE_LEN {
            return Err(DemError::HgtLen(mmap.len() as u64, path.as_ref().to_owned()));
        }

        Ok(Self::with_store(sw_corner, SampleStore::MemMap(mmap)))
    }

    /// Returns a tile whose samples are already in memory.
    ///
    /// `samples` are row-major, starting at the north-west corner.
    pub fn in_mem(sw_corner: Coord<i16>, samples: Vec<i16>) -> Result<Self, DemError> {
        if samples.len() != SAMPLES_PER_TILE {
            return Err(DemError::SampleCount {
                expected: SAMPLES_PER_TILE,
                actual: samples.len(),
            });
        }
        Ok(Self::with_store(
            sw_corner,
            SampleStore::InMem(samples.into_boxed_slice()),
        ))
    }

    /// Southwest corner of this tile, in whole degrees.
    pub fn sw_corner(&self) -> Coord<i16> {
        self.sw_corner
    }

    /// Sample indices covered by this tile.
    pub fn extent(&self) -> Interval2D {
        self.extent
    }

    /// Returns the sample at index `(x, y)`.
    pub fn sample(&self, x: i32, y: i32) -> Result<i16, DemError> {
        if self.extent.contains(x, y) {
            Ok(self.samples.get_unchecked(self.linear_index(x, y)))
        } else {
            Err(DemError::OutOfBounds {
                x,
                y,
                extent: self.extent,
            })
        }
    }

    /// Returns the lowest elevation sample in this tile.
    pub fn min_elevation(&self) -> i16 {
        let mut min_elevation = self.min_elevation.load(Ordering::Relaxed);
        if min_elevation == i16::MAX {
            min_elevation = self.samples.iter().min().unwrap_or_default();
            self.min_elevation.store(min_elevation, Ordering::Relaxed);
        }
        min_elevation
    }

    /// Returns the highest elevation sample in this tile.
    pub fn max_elevation(&self) -> i16 {
        let mut max_elevation = self.max_elevation.load(Ordering::Relaxed);
        if max_elevation == i16::MIN {
            max_elevation = self.samples.iter().max().unwrap_or_default();
            self.max_elevation.store(max_elevation, Ordering::Relaxed);
        }
        max_elevation
    }
}

/// Private API
impl HgtTile {
    fn with_store(sw_corner: Coord<i16>, samples: SampleStore) -> Self {
        let x0 = i32::from(sw_corner.x) * SAMPLES_PER_DEGREE;
        let y0 = i32::from(sw_corner.y) * SAMPLES_PER_DEGREE;
        let extent = Interval2D::new(
            Interval1D::new_unchecked(x0, x0 + SAMPLES_PER_DEGREE),
            Interval1D::new_unchecked(y0, y0 + SAMPLES_PER_DEGREE),
        );
        Self {
            sw_corner,
            extent,
            min_elevation: i16::MAX.into(),
            max_elevation: i16::MIN.into(),
            samples,
        }
    }

    /// Rows are stored north to south, so `y` counts down from the
    /// top of the file.
    fn linear_index(&self, x: i32, y: i32) -> usize {
        let col = (x - self.extent.x().included_from()) as usize;
        let row = (self.extent.y().included_to() - y) as usize;
        row * SAMPLES_PER_ROW + col
    }
}

fn check_len<P: AsRef<Path>>(path: P) -> Result<(), DemError> {
    match path.as_ref().metadata().map(|m| m.len())? {
        HGT_FILE_LEN => Ok(()),
        invalid_len => Err(DemError::HgtLen(invalid_len, path.as_ref().to_owned())),
    }
}

/// Parses a `[N|S]DD[E|W]DDD.hgt` file name into the tile's
/// southwest corner.
pub(crate) fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<i16>, DemError> {
    let mk_err = || DemError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?;
    if name.len() != 11 || !name.is_ascii() || !name.ends_with(".hgt") {
        return Err(mk_err());
    }
    let digits = |s: &str, max: i16| -> Result<i16, DemError> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(mk_err());
        }
        match s.parse::<i16>() {
            Ok(v) if v < max => Ok(v),
            _ => Err(mk_err()),
        }
    };
    let lat_sign = match &name[0..1] {
        "N" => 1,
        "S" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * digits(&name[1..3], 90)?;
    let lon_sign = match &name[3..4] {
        "E" => 1,
        "W" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * digits(&name[4..7], 180)?;
    Ok(Coord { x: lon, y: lat })
}
