pub mod adjoint;
pub mod api;
pub mod dual;
pub mod dual_vec;
pub mod float;
pub mod material;
pub mod scalar;
pub mod store;
pub mod tensor;
mod traits;

pub use api::{get_gradient, get_value, jacobian, jvp, make_dual, seed_direction};
pub use dual::Dual;
pub use dual_vec::DualVec;
pub use float::Float;
pub use scalar::Scalar;
pub use tensor::{lift, Mat3, Tensor4, Vec3};

/// Type alias for one-lane dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for one-lane dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
/// Nine-lane dual over `f64`, one lane per component of a rank-2 kinematic
/// input; a single evaluation carries the full material tangent.
pub type Dual9 = DualVec<f64, 9>;
