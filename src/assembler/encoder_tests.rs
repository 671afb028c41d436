// Instruction encoder tests

#[cfg(test)]
mod tests {
    use crate::assembler::encoder::{classify, encode_line, Statement};
    use crate::assembler::error::AssemblerError;
    use crate::assembler::normalizer::SourceLine;
    use crate::assembler::opcodes::{BankTarget, Register, OPCODE_TABLE};
    use test_log::test;

    fn encode(text: &str) -> Result<u8, AssemblerError> {
        encode_line(&SourceLine::new(1, text))
    }

    #[test]
    fn test_no_operand_bases() {
        assert_eq!(encode("halt"), Ok(0x13));
        assert_eq!(encode("load"), Ok(0x10));
        assert_eq!(encode("invalid11"), Ok(0x11));
        assert_eq!(encode("invalid12"), Ok(0x12));
    }

    #[test]
    fn test_zero_operand_contribution_is_base() {
        assert_eq!(encode("immd 0"), Ok(0x00));
        assert_eq!(encode("mix a"), Ok(0x14));
        assert_eq!(encode("inc a"), Ok(0x18));
        assert_eq!(encode("dec a"), Ok(0x1c));
        assert_eq!(encode("bit a a"), Ok(0x20));
        assert_eq!(encode("onto a a"), Ok(0x30));
    }

    #[test]
    fn test_sign_prefix() {
        assert_eq!(encode("+halt"), Ok(0x13 + 0x80));
        assert_eq!(encode("-halt"), encode("halt"));
        assert_eq!(encode("+immd 3"), Ok(0x83));
    }

    #[test]
    fn test_condition_prefix() {
        assert_eq!(encode("!halt"), Ok(0x53));
        assert_eq!(encode("+!halt"), Ok(0x13 + 0xc0));
        assert_eq!(encode("-!halt"), Ok(0x53));
    }

    #[test]
    fn test_prefix_order_matters() {
        // '!' must follow the sign, so '!+halt' looks up '+halt'
        assert_eq!(
            encode("!+halt"),
            Err(AssemblerError::UnknownMnemonic("+halt".to_string(), 1))
        );
    }

    #[test]
    fn test_all_prefix_combinations() {
        for (base, &value) in OPCODE_TABLE.iter() {
            if *base == "bank" {
                continue;
            }
            let operands = match *base {
                "immd" => " 0",
                "bit" | "onto" => " a a",
                "mix" | "inc" | "dec" => " a",
                _ => "",
            };
            for (prefix, bits) in [("", 0x00), ("-", 0x00), ("+", 0x80), ("!", 0x40), ("+!", 0xc0)] {
                let text = format!("{}{}{}", prefix, base, operands);
                assert_eq!(encode(&text), Ok(value + bits), "encoding '{}'", text);
            }
        }
    }

    #[test]
    fn test_register_pair_bijection() {
        let registers = ["a", "ip", "p", "[p]"];
        let mut seen = std::collections::HashSet::new();
        for (src_code, src) in registers.iter().enumerate() {
            for (dest_code, dest) in registers.iter().enumerate() {
                let byte = encode(&format!("bit {} {}", src, dest)).unwrap();
                let operand_bits = byte - 0x20;
                assert_eq!(operand_bits as usize, (dest_code << 2) + src_code);
                assert!(seen.insert(operand_bits));

                let onto = encode(&format!("onto {} {}", src, dest)).unwrap();
                assert_eq!(onto - 0x30, operand_bits);
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_single_register_operands() {
        assert_eq!(encode("inc ip"), Ok(0x19));
        assert_eq!(encode("dec p"), Ok(0x1e));
        assert_eq!(encode("mix [p]"), Ok(0x17));
    }

    #[test]
    fn test_bank_targets() {
        assert_eq!(encode("bank ip"), Ok(0x3f));
        assert_eq!(encode("bank p"), Ok(0x2f));
        assert_eq!(encode("!bank ip"), Ok(0x7f));
        assert_eq!(
            encode("bank a"),
            Err(AssemblerError::InvalidOperand(
                "bank".to_string(),
                "a".to_string(),
                1
            ))
        );
        assert!(matches!(
            encode("bank [p]"),
            Err(AssemblerError::InvalidOperand(_, _, 1))
        ));
    }

    #[test]
    fn test_immd_nibble_range() {
        assert_eq!(encode("immd 15"), Ok(0x0f));
        assert_eq!(
            encode("immd 16"),
            Err(AssemblerError::RangeError(16, 0, 16, 1))
        );
        assert!(matches!(
            encode("immd -1"),
            Err(AssemblerError::RangeError(-1, 0, 16, 1))
        ));
    }

    #[test]
    fn test_data_values() {
        assert_eq!(encode("data 200"), Ok(200));
        assert_eq!(encode("data -56"), Ok(200));
        assert_eq!(
            encode("data 256"),
            Err(AssemblerError::RangeError(256, -127, 256, 1))
        );
    }

    #[test]
    fn test_data_takes_no_prefix() {
        assert_eq!(
            encode("+data 1"),
            Err(AssemblerError::UnknownMnemonic("data".to_string(), 1))
        );
    }

    #[test]
    fn test_unknown_mnemonic() {
        assert_eq!(
            encode("jump a"),
            Err(AssemblerError::UnknownMnemonic("jump".to_string(), 1))
        );
    }

    #[test]
    fn test_missing_mnemonic_after_prefix() {
        assert!(matches!(encode("+"), Err(AssemblerError::SyntaxError(_, 1))));
        assert!(matches!(encode("+!"), Err(AssemblerError::SyntaxError(_, 1))));
    }

    #[test]
    fn test_invalid_register() {
        assert_eq!(
            encode("inc i"),
            Err(AssemblerError::InvalidOperand(
                "inc".to_string(),
                "i".to_string(),
                1
            ))
        );
        assert!(matches!(
            encode("onto a q"),
            Err(AssemblerError::InvalidOperand(_, _, 1))
        ));
    }

    #[test]
    fn test_arity_errors() {
        let cases = [
            ("halt a", "halt", 0, 1),
            ("load 1 2", "load", 0, 2),
            ("immd", "immd", 1, 0),
            ("immd 1 2", "immd", 1, 2),
            ("bit a", "bit", 2, 1),
            ("onto a a a", "onto", 2, 3),
            ("mix", "mix", 1, 0),
            ("bank", "bank", 1, 0),
            ("bank ip p", "bank", 1, 2),
            ("data", "data", 1, 0),
            ("data 1 2", "data", 1, 2),
        ];
        for (text, mnemonic, expected, found) in cases {
            assert_eq!(
                encode(text),
                Err(AssemblerError::ArityError(
                    mnemonic.to_string(),
                    expected,
                    found,
                    1
                )),
                "encoding '{}'",
                text
            );
        }
    }

    #[test]
    fn test_classification() {
        let classify_text = |text: &str| classify(&SourceLine::new(1, text)).unwrap();
        assert_eq!(classify_text("data 9"), Statement::Data(9));
        assert_eq!(
            classify_text("+bank p"),
            Statement::Bank {
                prefix: 0x80,
                target: BankTarget::P
            }
        );
        assert_eq!(
            classify_text("onto [p] a"),
            Statement::BitOnto {
                prefix: 0,
                base: 0x30,
                src: Register::IndirectP,
                dest: Register::A
            }
        );
        assert_eq!(
            classify_text("!halt"),
            Statement::NoArg {
                prefix: 0x40,
                base: 0x13
            }
        );
    }

    #[test]
    fn test_largest_encoding_fits() {
        assert_eq!(encode("+!onto [p] [p]"), Ok(0xff));
        assert_eq!(encode("+!bank ip"), Ok(0xff));
    }
}
