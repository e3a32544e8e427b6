//! Real-root solvers for quadratic and cubic polynomials.
//!
//! Roots are written into a caller-provided array and the root count is
//! returned. `solve_quadratic` returns -1 for the degenerate identity
//! 0 = 0, which callers treat the same as "no usable roots".

use std::f64::consts::PI;

/// Coefficients whose ratio exceeds this are treated as a lower-degree
/// equation to avoid catastrophic cancellation.
const TOO_LARGE_RATIO: f64 = 1e12;

/// Solves a*x^2 + b*x + c = 0.
pub fn solve_quadratic(x: &mut [f64; 2], a: f64, b: f64, c: f64) -> i32 {
    // a = 0 -> linear equation
    if a == 0.0 || b.abs() + c.abs() > TOO_LARGE_RATIO * a.abs() {
        // a, b = 0 -> no solution
        if b == 0.0 || c.abs() > TOO_LARGE_RATIO * b.abs() {
            if c == 0.0 {
                return -1; // 0 = 0
            }
            return 0;
        }
        x[0] = -c / b;
        return 1;
    }

    let mut dscr = b * b - 4.0 * a * c;
    if dscr > 0.0 {
        dscr = dscr.sqrt();
        x[0] = (-b + dscr) / (2.0 * a);
        x[1] = (-b - dscr) / (2.0 * a);
        2
    } else if dscr == 0.0 {
        x[0] = -b / (2.0 * a);
        1
    } else {
        0
    }
}

fn solve_cubic_normed(x: &mut [f64; 3], a: f64, b: f64, c: f64) -> i32 {
    let a2 = a * a;
    let mut q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;

    if r2 < q3 {
        let t = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let a3 = a / 3.0;
        q = -2.0 * q.sqrt();
        x[0] = q * (t / 3.0).cos() - a3;
        x[1] = q * ((t + 2.0 * PI) / 3.0).cos() - a3;
        x[2] = q * ((t - 2.0 * PI) / 3.0).cos() - a3;
        3
    } else {
        let mut u = -(r.abs() + (r2 - q3).sqrt()).powf(1.0 / 3.0);
        if r < 0.0 {
            u = -u;
        }
        let v = if u == 0.0 { 0.0 } else { q / u };

        let a3 = a / 3.0;
        x[0] = (u + v) - a3;
        x[1] = -0.5 * (u + v) - a3;
        x[2] = 0.5 * 3.0f64.sqrt() * (u - v);

        // x[1] is a double root when the complex part x[2] vanishes
        if x[2].abs() < 1e-14 {
            return 2;
        }
        1
    }
}

/// Solves a*x^3 + b*x^2 + c*x + d = 0.
pub fn solve_cubic(x: &mut [f64; 3], a: f64, b: f64, c: f64, d: f64) -> i32 {
    if a != 0.0 {
        let (bn, cn, dn) = (b / a, c / a, d / a);
        // Check that a isn't "almost zero"
        if bn.abs() < TOO_LARGE_RATIO && cn.abs() < TOO_LARGE_RATIO && dn.abs() < TOO_LARGE_RATIO {
            return solve_cubic_normed(x, bn, cn, dn);
        }
    }
    let mut x2 = [0.0; 2];
    let n = solve_quadratic(&mut x2, b, c, d);
    x[0] = x2[0];
    x[1] = x2[1];
    n
}
