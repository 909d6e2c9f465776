use anyhow::Result;
use svg_captcha_solver::config::Config;
use svg_captcha_solver::utils::logging;
use svg_captcha_solver::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::load()?;

    // 第一个参数可以覆盖输入路径
    if let Some(input) = std::env::args().nth(1) {
        config.input_path = input;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    if stats.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
