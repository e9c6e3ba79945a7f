use crate::TerrainError;

/// Scans `[min_x, max_x]` in steps of `dx` and returns the lower
/// bound of the first step over which `f` changes sign, if any.
///
/// Sign changes narrower than `dx` can be stepped over.
pub fn first_interval_containing_root<F>(
    mut f: F,
    min_x: f64,
    max_x: f64,
    dx: f64,
) -> Result<Option<f64>, TerrainError>
where
    F: FnMut(f64) -> Result<f64, TerrainError>,
{
    let mut lo = min_x;
    let mut f_lo = f(lo)?;
    let mut step = 1_u32;
    loop {
        let hi = min_x + f64::from(step) * dx;
        if hi > max_x {
            return Ok(None);
        }
        let f_hi = f(hi)?;
        if f_lo * f_hi <= 0.0 {
            return Ok(Some(lo));
        }
        lo = hi;
        f_lo = f_hi;
        step += 1;
    }
}

/// Bisects `[x1, x2]` until it is at most `epsilon` wide and returns
/// its lower bound.
///
/// `f(x1)` and `f(x2)` must not have the same sign.
pub fn improve_root<F>(mut f: F, x1: f64, x2: f64, epsilon: f64) -> Result<f64, TerrainError>
where
    F: FnMut(f64) -> Result<f64, TerrainError>,
{
    let (mut x1, mut x2) = (x1, x2);
    let mut f1 = f(x1)?;
    if f1 * f(x2)? > 0.0 {
        return Err(TerrainError::Bracket(x1, x2));
    }
    while x2 - x1 > epsilon {
        let m = (x1 + x2) / 2.0;
        let fm = f(m)?;
        if f1 * fm > 0.0 {
            x1 = m;
            f1 = fm;
        } else {
            x2 = m;
        }
    }
    Ok(x1)
}
