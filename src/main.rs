fn main() -> Result<(), Box<dyn std::error::Error>> {
    sidechat::cli::main()
}
