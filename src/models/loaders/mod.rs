pub mod svg_loader;

pub use svg_loader::{load_captcha_file, load_captcha_files, CaptchaFile};
