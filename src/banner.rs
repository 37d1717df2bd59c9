// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
  __ _                _       _     _
 / _(_)              (_)     | |   | |
| |_ _ __  __ ___  _  _  ____| |__ | |_
|  _| \ \/ // __|| |/ |/ _  ||  _ \|  _)
| | | |>  < \__ \| |( ( (_| || | | | |_
|_| |_/_/\_\|___/|_|\_)____ ||_| |_|\__)
                      (_____|

    Is it fixable? Ask the model.
"#;
    println!("{}", banner);
}
