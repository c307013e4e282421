use latprobe::error::AppResult;

fn main() -> AppResult<()> {
    latprobe::run()
}
