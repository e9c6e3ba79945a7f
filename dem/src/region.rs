//! Loading every tile of a rectangular region from a tile directory.

use crate::{DemError, DiscreteElevationModel, HgtTile, TileMode};
use geo::geometry::Coord;
use log::debug;
use std::path::{Path, PathBuf};

/// Loads the tiles whose southwest corners lie in the inclusive box
/// `sw..=ne` (whole degrees) and unions them into one model.
///
/// Each row is combined west to east, then rows south to north. A
/// missing tile is an error.
pub fn load_region<P: AsRef<Path>>(
    tile_dir: P,
    sw: Coord<i16>,
    ne: Coord<i16>,
    mode: TileMode,
) -> Result<DiscreteElevationModel, DemError> {
    if ne.x < sw.x || ne.y < sw.y {
        return Err(DemError::Region(sw, ne));
    }

    let now = std::time::Instant::now();
    let mut region: Option<DiscreteElevationModel> = None;
    for lat in sw.y..=ne.y {
        let mut row: Option<DiscreteElevationModel> = None;
        for lon in sw.x..=ne.x {
            let path = tile_path(tile_dir.as_ref(), Coord { x: lon, y: lat })?;
            let tile = DiscreteElevationModel::from(HgtTile::open(path, mode)?);
            row = Some(match row {
                None => tile,
                Some(row) => row.union(tile)?,
            });
        }
        if let Some(row) = row {
            region = Some(match region {
                None => row,
                Some(region) => region.union(row)?,
            });
        }
    }

    let region = region.ok_or(DemError::Region(sw, ne))?;
    debug!(
        "region; tiles: {}, extent: {}, load_exec: {:?}",
        region.tile_count(),
        region.extent(),
        now.elapsed()
    );
    Ok(region)
}

/// Returns the expected file name for the tile whose southwest corner
/// is `sw_corner`.
pub fn tile_file_name(Coord { x, y }: Coord<i16>) -> String {
    let (n_s, lat) = {
        let lat = y.abs();
        let n_s = if y.is_negative() { 'S' } else { 'N' };
        (n_s, lat)
    };
    let (e_w, lon) = {
        let lon = x.abs();
        let e_w = if x.is_negative() { 'W' } else { 'E' };
        (e_w, lon)
    };
    format!("{n_s}{lat:02}{e_w}{lon:03}.hgt")
}

fn tile_path(tile_dir: &Path, sw_corner: Coord<i16>) -> Result<PathBuf, DemError> {
    let file_name = tile_file_name(sw_corner);
    let tile_path = tile_dir.join(&file_name);
    if tile_path.exists() {
        Ok(tile_path)
    } else {
        Err(DemError::MissingTile(tile_path))
    }
}

#[cfg(test)]
mod tests {
    use super::{load_region, tile_file_name, Coord};
    use crate::{test_util::write_tile, DemError, TileMode, SAMPLES_PER_DEGREE};

    #[test]
    fn test_file_name() {
        assert_eq!(tile_file_name(Coord { x: 7, y: 46 }), "N46E007.hgt");
        assert_eq!(tile_file_name(Coord { x: 0, y: 0 }), "N00E000.hgt");
        assert_eq!(tile_file_name(Coord { x: -1, y: 0 }), "N00W001.hgt");
        assert_eq!(tile_file_name(Coord { x: -72, y: -1 }), "S01W072.hgt");
        assert_eq!(tile_file_name(Coord { x: 179, y: 89 }), "N89E179.hgt");
    }

    #[test]
    fn test_load_region() {
        let dir = tempfile::tempdir().unwrap();
        write_tile(dir.path(), "N46E007.hgt", |_, _| 100);
        write_tile(dir.path(), "N46E008.hgt", |_, _| 200);

        let region = load_region(
            dir.path(),
            Coord { x: 7, y: 46 },
            Coord { x: 8, y: 46 },
            TileMode::MemMap,
        )
        .unwrap();
        assert_eq!(region.tile_count(), 2);
        assert_eq!(region.extent().x().included_from(), 7 * SAMPLES_PER_DEGREE);
        assert_eq!(region.extent().x().included_to(), 9 * SAMPLES_PER_DEGREE);
        let y = 46 * SAMPLES_PER_DEGREE + 10;
        assert_eq!(
            region
                .elevation_sample(7 * SAMPLES_PER_DEGREE + 10, y)
                .unwrap(),
            100.0
        );
        assert_eq!(
            region
                .elevation_sample(8 * SAMPLES_PER_DEGREE + 10, y)
                .unwrap(),
            200.0
        );
    }

    #[test]
    fn test_load_region_missing_tile() {
        let dir = tempfile::tempdir().unwrap();
        write_tile(dir.path(), "N46E007.hgt", |_, _| 100);
        assert!(matches!(
            load_region(
                dir.path(),
                Coord { x: 7, y: 46 },
                Coord { x: 7, y: 47 },
                TileMode::InMem,
            ),
            Err(DemError::MissingTile(_))
        ));
    }

    #[test]
    fn test_load_region_inverted_box() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_region(
                dir.path(),
                Coord { x: 8, y: 46 },
                Coord { x: 7, y: 46 },
                TileMode::MemMap,
            ),
            Err(DemError::Region(..))
        ));
    }
}
