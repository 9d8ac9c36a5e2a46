use std::io::{self, Write};

pub fn show_menu() {
    println!("\n===========================================");
    println!("Real-Time Chart Pipeline");
    println!("===========================================");
    println!("Select an option:");
    println!("1. Threaded Pipeline Demo");
    println!("2. Async Pipeline Demo");
    println!("3. Exit");
    println!("===========================================");
    print!("Choice (1-3): ");
    io::stdout().flush().unwrap();
}

pub fn get_user_choice() -> Result<u32, std::num::ParseIntError> {
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().parse::<u32>()
}

pub fn wait_for_enter() {
    println!("\nPress Enter to return to menu...");
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
}
