mod tests {
    use octo_ws2811::{DoubleBuffer, Error, block_len, frame_len};

    #[test]
    fn test_buffers_zeroed_for_any_length() {
        for pixels in [0, 1, 2, 17, 240] {
            let mut block = vec![0xAA_u8; block_len(pixels)];
            let buffers = DoubleBuffer::new(pixels, &mut block).unwrap();
            assert_eq!(buffers.frame_len(), 24 * pixels);
            assert!(buffers.front().iter().all(|&byte| byte == 0));
            assert!(buffers.draw().iter().all(|&byte| byte == 0));
        }
    }

    #[test]
    fn test_halves_are_adjacent() {
        let mut block = [0_u8; block_len(3)];
        let base = block.as_ptr() as usize;
        let buffers = DoubleBuffer::new(3, &mut block).unwrap();
        assert_eq!(buffers.front_ptr() as usize, base);
        assert_eq!(buffers.draw_ptr() as usize, base + frame_len(3));
    }

    #[test]
    fn test_extra_bytes_untouched() {
        let mut block = [0xAA_u8; block_len(2) + 4];
        {
            let buffers = DoubleBuffer::new(2, &mut block).unwrap();
            assert_eq!(buffers.frame_len(), 48);
        }
        assert!(block[..block_len(2)].iter().all(|&byte| byte == 0));
        assert_eq!(block[block_len(2)..], [0xAA; 4]);
    }

    #[test]
    fn test_block_too_small() {
        let mut block = [0_u8; 47];
        let result = DoubleBuffer::new(2, &mut block);
        assert_eq!(
            result.err(),
            Some(Error::BufferTooSmall {
                required: 96,
                provided: 47
            })
        );
    }

    #[test]
    fn test_swap_exchanges_pointers_without_copy() {
        let mut block = [0_u8; block_len(1)];
        let mut buffers = DoubleBuffer::new(1, &mut block).unwrap();
        let front = buffers.front_ptr();
        let draw = buffers.draw_ptr();

        buffers.draw_mut()[0] = 7;
        buffers.swap();
        assert_eq!(buffers.front_ptr(), draw);
        assert_eq!(buffers.draw_ptr(), front);
        assert_eq!(buffers.front()[0], 7);
        assert_eq!(buffers.draw()[0], 0);

        buffers.swap();
        assert_eq!(buffers.front_ptr(), front);
        assert_eq!(buffers.draw_ptr(), draw);
        assert_eq!(buffers.draw()[0], 7);
        assert_eq!(buffers.front()[0], 0);
    }

    #[test]
    fn test_from_raw_zeroes_block() {
        let mut block = [0x55_u8; block_len(1)];
        let base = core::ptr::NonNull::new(block.as_mut_ptr()).unwrap();
        // SAFETY: `block` is large enough and not touched while `buffers` lives.
        let buffers = unsafe { DoubleBuffer::from_raw(base, 1) };
        assert!(buffers.front().iter().all(|&byte| byte == 0));
        assert!(buffers.draw().iter().all(|&byte| byte == 0));
    }
}
