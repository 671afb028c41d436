// End-to-end assembly tests: normalized text in, serialized banks out

#[cfg(test)]
mod tests {
    use crate::assembler::{assemble, Assembler, AssemblerError, Position, BANK_SIZE};
    use test_log::test;

    fn nonzero(output: &[u8]) -> Vec<(usize, u8)> {
        output
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0)
            .map(|(i, b)| (i, *b))
            .collect()
    }

    #[test]
    fn test_single_immediate() {
        let output = assemble("immd 5").unwrap();
        assert_eq!(output.len(), BANK_SIZE);
        assert_eq!(nonzero(&output), vec![(0, 0x05)]);
    }

    #[test]
    fn test_conditional_halt() {
        let output = assemble("!halt").unwrap();
        assert_eq!(output.len(), BANK_SIZE);
        assert_eq!(nonzero(&output), vec![(0, 0x53)]);
    }

    #[test]
    fn test_address_directive() {
        let output = assemble("5:\ndata 9").unwrap();
        assert_eq!(output.len(), BANK_SIZE);
        assert_eq!(nonzero(&output), vec![(5, 9)]);
    }

    #[test]
    fn test_bank_directive_fills_lower_banks() {
        let output = assemble("2:16:\ndata 1").unwrap();
        assert_eq!(output.len(), 3 * BANK_SIZE);
        assert_eq!(nonzero(&output), vec![(2 * BANK_SIZE + 16, 1)]);
    }

    #[test]
    fn test_directive_only_bank_is_emitted() {
        let output = assemble("data 1\n3:0:").unwrap();
        assert_eq!(output.len(), 4 * BANK_SIZE);
        assert_eq!(nonzero(&output), vec![(0, 1)]);
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(assemble("").unwrap(), vec![0; BANK_SIZE]);
        assert_eq!(assemble("# nothing here\n\n").unwrap(), vec![0; BANK_SIZE]);
    }

    #[test]
    fn test_sequential_placement() {
        let source = "immd 1\nimmd 2\n+!load\ndata -1";
        let output = assemble(source).unwrap();
        assert_eq!(&output[..4], &[0x01, 0x02, 0xd0, 0xff]);
        assert!(output[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_address_directive_keeps_bank() {
        let output = assemble("1:0:\ndata 1\n10:\ndata 2").unwrap();
        assert_eq!(output.len(), 2 * BANK_SIZE);
        assert_eq!(
            nonzero(&output),
            vec![(BANK_SIZE, 1), (BANK_SIZE + 10, 2)]
        );
    }

    #[test]
    fn test_returning_to_lower_bank() {
        let source = "1:0:\ndata 7\n0:3:\ndata 8";
        let output = assemble(source).unwrap();
        assert_eq!(output.len(), 2 * BANK_SIZE);
        assert_eq!(nonzero(&output), vec![(3, 8), (BANK_SIZE, 7)]);
    }

    #[test]
    fn test_comments_and_case_in_program() {
        let source = "# program\n  IMMD 3 # three\n\n  +!HALT\n";
        let output = assemble(source).unwrap();
        assert_eq!(&output[..2], &[0x03, 0xd3]);
    }

    #[test]
    fn test_bank_overflow() {
        let source = "data 0\n".repeat(256);
        assert_eq!(
            assemble(&source),
            Err(AssemblerError::BankOverflow(0, 256))
        );
    }

    #[test]
    fn test_full_bank_less_one_fits() {
        let source = "data 1\n".repeat(255);
        let output = assemble(&source).unwrap();
        assert_eq!(output.len(), BANK_SIZE);
        assert_eq!(output.iter().filter(|&&b| b == 1).count(), 255);
    }

    #[test]
    fn test_directive_resets_overflow() {
        let mut source = "data 1\n".repeat(200);
        source.push_str("1:0:\n");
        source.push_str(&"data 2\n".repeat(200));
        let output = assemble(&source).unwrap();
        assert_eq!(output.len(), 2 * BANK_SIZE);
        assert_eq!(output[BANK_SIZE + 199], 2);
    }

    #[test]
    fn test_error_reports_physical_line() {
        let err = assemble("# header\nimmd 1\n\nimmd 99").unwrap_err();
        assert_eq!(err, AssemblerError::RangeError(99, 0, 16, 4));
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_error_aborts_whole_run() {
        assert!(assemble("immd 1\nimmd 2\nbogus").is_err());
    }

    #[test]
    fn test_bad_directive() {
        assert!(matches!(
            assemble("1:2:3:\nhalt"),
            Err(AssemblerError::SyntaxError(_, 1))
        ));
    }

    #[test]
    fn test_position_after_pass() {
        let mut assembler = Assembler::new();
        for line in crate::assembler::normalizer::normalize("2:40:\nhalt\nhalt") {
            assembler.process_line(&line).unwrap();
        }
        assert_eq!(assembler.position(), Position::new(2, 42));
        assert_eq!(assembler.image().read(2, 41), 0x13);
    }
}
