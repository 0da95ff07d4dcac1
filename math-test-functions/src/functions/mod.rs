//! One module per test function.

mod ackley;
mod beale;
mod booth;
mod branin;
mod easom;
mod exponential;
mod goldstein_price;
mod griewank;
mod himmelblau;
mod levy;
mod matyas;
mod rastrigin;
mod rosenbrock;
mod schwefel;
mod six_hump_camel;
mod sphere;
mod styblinski_tang;
mod zakharov;

pub use ackley::Ackley;
pub use beale::Beale;
pub use booth::Booth;
pub use branin::Branin;
pub use easom::Easom;
pub use exponential::Exponential;
pub use goldstein_price::GoldsteinPrice;
pub use griewank::Griewank;
pub use himmelblau::Himmelblau;
pub use levy::Levy;
pub use matyas::Matyas;
pub use rastrigin::Rastrigin;
pub use rosenbrock::Rosenbrock;
pub use schwefel::Schwefel;
pub use six_hump_camel::SixHumpCamel;
pub use sphere::Sphere;
pub use styblinski_tang::StyblinskiTang;
pub use zakharov::Zakharov;
