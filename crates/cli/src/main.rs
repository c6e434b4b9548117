fn main() -> Result<(), Box<dyn std::error::Error>> {
    pickscope_cli::run()
}
