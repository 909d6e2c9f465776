pub mod captcha_solver;
pub mod solve_ctx;

pub use captcha_solver::CaptchaSolver;
pub use solve_ctx::SolveCtx;
