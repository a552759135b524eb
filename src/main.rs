fn main() -> Result<(), Box<dyn std::error::Error>> {
    heidi_guide::cli::main()
}
