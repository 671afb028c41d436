// bankasm - assembler for the banked 8-bit instruction set
// Translates a source file into a raw memory image of 256-byte banks

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use bankasm::config::AssemblerConfig;
use bankasm::vm::{BankedMemory, Cpu, RunOutcome};
use bankasm::{Assembler, AssemblerError};

struct Options {
    input_file: String,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    run: bool,
    verbose: bool,
}

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let options = parse_args(&args);

    if let Err(err) = assemble_file(&options) {
        eprintln!("Assembly error: {}", err);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        input_file: String::new(),
        output_file: None,
        config_file: None,
        run: false,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: -o requires a filename");
                    process::exit(1);
                }
                options.output_file = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "-c" | "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a filename");
                    process::exit(1);
                }
                options.config_file = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "-r" | "--run" => {
                options.run = true;
                i += 1;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                eprintln!("Error: Unknown option '{}'", arg);
                print_usage(&args[0]);
                process::exit(1);
            }
            _ => {
                if options.input_file.is_empty() {
                    options.input_file = args[i].clone();
                } else {
                    eprintln!("Error: Multiple input files specified");
                    process::exit(1);
                }
                i += 1;
            }
        }
    }

    if options.input_file.is_empty() {
        eprintln!("Error: No input file specified");
        print_usage(&args[0]);
        process::exit(1);
    }

    options
}

fn assemble_file(options: &Options) -> Result<(), AssemblerError> {
    let config = match &options.config_file {
        Some(path) => AssemblerConfig::load(path)?,
        None => AssemblerConfig::default(),
    };

    let source = fs::read_to_string(&options.input_file).map_err(|e| {
        AssemblerError::IOError(format!("reading '{}': {}", options.input_file, e))
    })?;

    // Nothing is written unless the whole program assembles
    let image = Assembler::new().assemble(&source)?;

    let output_file = options.output_file.clone().or(config.output.clone());
    match &output_file {
        Some(path) => {
            fs::write(path, &image).map_err(|e| {
                AssemblerError::IOError(format!("writing '{}': {}", path.display(), e))
            })?;
            if options.verbose {
                eprintln!(
                    "Assembled {} -> {} ({} bytes, {} banks)",
                    options.input_file,
                    path.display(),
                    image.len(),
                    image.len() / bankasm::assembler::BANK_SIZE
                );
            }
        }
        None if !options.run => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&image)?;
            handle.flush()?;
        }
        None => {}
    }

    if options.run {
        let mut memory = BankedMemory::from_image(&image).map_err(AssemblerError::IOError)?;
        let mut cpu = Cpu::with_start_bank(config.vm.start_bank);
        cpu.trace = config.vm.trace;
        match cpu.run(&mut memory, config.vm.max_steps) {
            RunOutcome::Halted { steps } => eprintln!("Halted after {} steps", steps),
            RunOutcome::StepLimit { steps } => {
                eprintln!("Stopped at step limit ({} steps)", steps)
            }
        }
        eprintln!("{}", cpu);
    }

    Ok(())
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [options] <input.asm>", program_name);
    println!();
    println!("Options:");
    println!("  -o, --output <file>    Output filename (default: stdout)");
    println!("  -c, --config <file>    TOML configuration file");
    println!("  -r, --run              Execute the assembled image in the emulator");
    println!("  -v, --verbose          Verbose output");
    println!("  -h, --help             Show this help message");
    println!();
    println!("Examples:");
    println!("  {} prog.asm > prog.bin", program_name);
    println!("  {} -o prog.bin prog.asm", program_name);
    println!("  {} --run prog.asm", program_name);
}
