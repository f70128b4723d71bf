use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rawcell_bytes::{ByteBuffer, Order};
use rstest::{fixture, rstest};

#[fixture]
fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5EED_B17E)
}

/// Buffer whose bytes are the low `N` bytes of `value`, least significant first.
fn buffer_of<const N: usize>(value: u64) -> ByteBuffer<N> {
    ByteBuffer::from_slice(&value.to_le_bytes()[..N])
}

fn value_of<const N: usize>(buffer: &ByteBuffer<N>) -> u64 {
    let mut bytes = [0u8; 8];
    bytes[..N].copy_from_slice(buffer.as_slice());
    u64::from_le_bytes(bytes)
}

fn mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn reference_shl(value: u64, shift: usize, bits: usize) -> u64 {
    if shift >= bits {
        0
    } else {
        (value << shift) & mask(bits)
    }
}

fn reference_shr(value: u64, shift: usize, bits: usize) -> u64 {
    if shift >= bits {
        0
    } else {
        value >> shift
    }
}

fn reference_rotl(value: u64, shift: usize, bits: usize) -> u64 {
    let shift = shift % bits;
    if shift == 0 {
        value
    } else {
        ((value << shift) | (value >> (bits - shift))) & mask(bits)
    }
}

fn check_shifts_against_reference<const N: usize>(value: u64) {
    let bits = N * 8;
    let buffer = buffer_of::<N>(value);
    for shift in 0..=bits + 3 {
        assert_eq!(value_of(&(buffer << shift)), reference_shl(value, shift, bits), "{value:#x} << {shift} (N = {})", N);
        assert_eq!(value_of(&(buffer >> shift)), reference_shr(value, shift, bits), "{value:#x} >> {shift} (N = {})", N);
        assert_eq!(value_of(&buffer.rotate_left(shift)), reference_rotl(value, shift, bits), "{value:#x} rotl {shift} (N = {})", N);
    }
}

#[rstest]
fn shifts_match_integer_reference_for_every_single_byte() {
    for value in 0..=u8::MAX as u64 {
        check_shifts_against_reference::<1>(value);
    }
}

#[rstest]
fn shifts_match_integer_reference_for_every_two_bytes() {
    for value in 0..=u16::MAX as u64 {
        check_shifts_against_reference::<2>(value);
    }
}

#[rstest]
fn shifts_match_integer_reference_for_sampled_wider_buffers(mut rng: StdRng) {
    for _ in 0..2000 {
        check_shifts_against_reference::<3>(rng.gen::<u64>() & mask(24));
        check_shifts_against_reference::<5>(rng.gen::<u64>() & mask(40));
        check_shifts_against_reference::<8>(rng.gen::<u64>());
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(7)]
#[case(8)]
#[case(9)]
#[case(63)]
#[case(64)]
#[case(100)]
fn shift_then_unshift_clears_only_the_pushed_out_bits(#[case] shift: usize, mut rng: StdRng) {
    let buffer = ByteBuffer::<8>::from_array(rng.gen());
    let round_trip = (buffer << shift) >> shift;

    let bits = ByteBuffer::<8>::BITS;
    for pos in 0..bits {
        let expected = pos < bits.saturating_sub(shift) && buffer.test_bit(pos);
        assert_eq!(round_trip.test_bit(pos), expected, "bit {pos} after << {shift} >> {shift}");
    }
}

#[rstest]
fn shifting_by_the_full_width_zeroes(mut rng: StdRng) {
    let buffer = ByteBuffer::<5>::from_array(rng.gen());
    assert_eq!(buffer << 40, ByteBuffer::new());
    assert_eq!(buffer >> 40, ByteBuffer::new());
    assert_eq!(buffer << usize::MAX, ByteBuffer::new());
    assert_eq!(buffer << 0, buffer);
    assert_eq!(buffer >> 0, buffer);
}

#[rstest]
fn shift_assign_matches_shift() {
    let mut buffer = ByteBuffer::<3>::from_array([0xFF, 0x00, 0x81]);
    let expected = buffer << 5;
    buffer <<= 5;
    assert_eq!(buffer, expected);

    let expected = buffer >> 11;
    buffer >>= 11;
    assert_eq!(buffer, expected);
}

fn check_rotation_round_trip<const N: usize>(rng: &mut StdRng) {
    let buffer = ByteBuffer::<N>::from_slice(&rng.gen::<[u8; 32]>());
    for k in 0..N * 8 {
        assert_eq!(buffer.rotate_left(k).rotate_right(k), buffer, "rotate {k} (N = {})", N);
        assert_eq!(buffer.rotate_right(k).rotate_left(k), buffer, "rotate {k} (N = {})", N);
        assert_eq!(buffer.rotate_left(k), (buffer << k) | (buffer >> (N * 8 - k)));
    }
    assert_eq!(buffer.rotate_left(N * 8), buffer);
    assert_eq!(buffer.rotate_right(N * 8 * 3), buffer);
}

#[rstest]
fn rotations_invert_each_other(mut rng: StdRng) {
    for _ in 0..50 {
        check_rotation_round_trip::<1>(&mut rng);
        check_rotation_round_trip::<2>(&mut rng);
        check_rotation_round_trip::<3>(&mut rng);
        check_rotation_round_trip::<7>(&mut rng);
        check_rotation_round_trip::<16>(&mut rng);
    }
}

#[rstest]
fn rotate_carries_the_top_bit_around() {
    let buffer = ByteBuffer::<2>::from_array([0x00, 0x80]);
    assert_eq!(buffer.rotate_left(1).as_array(), &[0x01, 0x00]);
    assert_eq!(buffer.rotate_right(15).as_array(), &[0x01, 0x00]);
    assert_eq!(buffer.rotate_left(17), buffer.rotate_left(1));
}

#[rstest]
fn bytewise_operators() {
    let a = ByteBuffer::<2>::from_array([0b1100_1100, 0xF0]);
    let b = ByteBuffer::<2>::from_array([0b1010_1010, 0x0F]);

    assert_eq!((a & b).as_array(), &[0b1000_1000, 0x00]);
    assert_eq!((a | b).as_array(), &[0b1110_1110, 0xFF]);
    assert_eq!((a ^ b).as_array(), &[0b0110_0110, 0xFF]);
    assert_eq!((!a).as_array(), &[0b0011_0011, 0x0F]);

    let mut c = a;
    c &= b;
    assert_eq!(c, a & b);
    c |= b;
    assert_eq!(c, (a & b) | b);
    let same = c;
    c ^= same;
    assert_eq!(c, ByteBuffer::new());
}

#[rstest]
fn popcount_is_additive(mut rng: StdRng) {
    for _ in 0..500 {
        let a = ByteBuffer::<12>::from_slice(&rng.gen::<[u8; 12]>());
        let b = ByteBuffer::<12>::from_slice(&rng.gen::<[u8; 12]>());
        assert_eq!(a.popcount() + b.popcount(), (a | b).popcount() + (a & b).popcount());
        assert_eq!(a.reverse().popcount(), a.popcount());
    }
    assert_eq!(ByteBuffer::<4>::from_array([0xFF; 4]).popcount(), 32);
    assert_eq!(ByteBuffer::<4>::new().popcount(), 0);
}

#[rstest]
fn bit_accessors_address_byte_then_bit() {
    let mut buffer = ByteBuffer::<2>::new();
    buffer.set_bit(0);
    buffer.set_bit(9);
    assert_eq!(buffer.as_array(), &[0b0000_0001, 0b0000_0010]);
    assert!(buffer.test_bit(9));
    assert!(!buffer.test_bit(8));

    buffer.toggle_bit(9);
    buffer.toggle_bit(15);
    assert_eq!(buffer.as_array(), &[0b0000_0001, 0b1000_0000]);

    buffer.clear_bit(0);
    assert_eq!(buffer.as_array(), &[0, 0b1000_0000]);
}

#[rstest]
#[case(16)]
#[case(17)]
#[case(1000)]
#[case(usize::MAX)]
fn bit_accessors_ignore_positions_past_the_end(#[case] pos: usize) {
    let mut buffer = ByteBuffer::<2>::from_array([0xAA, 0x55]);
    let before = buffer;

    buffer.set_bit(pos);
    buffer.clear_bit(pos);
    buffer.toggle_bit(pos);
    assert_eq!(buffer, before);
    assert!(!buffer.test_bit(pos));
}

#[rstest]
fn index_saturates_instead_of_panicking() {
    let mut buffer = ByteBuffer::<4>::from_array([1, 2, 3, 4]);
    assert_eq!(buffer[0], 1);
    assert_eq!(buffer[3], 4);
    assert_eq!(buffer[4], 4);
    assert_eq!(buffer[usize::MAX], 4);

    buffer[10] = 40;
    assert_eq!(buffer.as_array(), &[1, 2, 3, 40]);
    assert_eq!(unsafe { *buffer.get_unchecked(2) }, 3);
    unsafe { *buffer.get_unchecked_mut(0) = 10 };
    assert_eq!(*buffer.front(), 10);
    assert_eq!(*buffer.back(), 40);
}

#[cfg(any(debug_assertions, feature = "strict-unchecked"))]
#[rstest]
#[should_panic(expected = "out of range for a 4-byte buffer")]
fn unchecked_index_past_the_end_is_caught() {
    let buffer = ByteBuffer::<4>::new();
    // SAFETY: not upheld on purpose; the precondition check panics before the read.
    let _ = unsafe { *buffer.get_unchecked(4) };
}

#[rstest]
fn construction_copies_and_zero_fills() {
    assert_eq!(ByteBuffer::<4>::from_slice(&[1, 2]).as_array(), &[1, 2, 0, 0]);
    assert_eq!(ByteBuffer::<2>::from_slice(&[1, 2, 3, 4]).as_array(), &[1, 2]);
    assert_eq!(ByteBuffer::<3>::from_slice(&[]), ByteBuffer::new());
    assert_eq!(ByteBuffer::<3>::default(), ByteBuffer::from_array([0; 3]));
}

#[rstest]
fn integers_round_trip_through_native_bytes() {
    let buffer = ByteBuffer::<4>::from_int(0x1234_5678u32);
    assert_eq!(buffer.as_slice(), &0x1234_5678u32.to_ne_bytes());
    assert_eq!(buffer.to_int::<u32>(), 0x1234_5678);

    // wider buffers zero-extend, narrower ones truncate
    let wide = ByteBuffer::<16>::from_int(-1i32);
    assert_eq!(wide.to_int::<u64>().count_ones(), 32);
    assert_eq!(wide.to_int::<i32>(), -1);

    let narrow = ByteBuffer::<1>::from_int(0xABCDu16);
    assert_eq!(narrow.to_int::<u16>(), u16::from_ne_bytes(0xABCDu16.to_ne_bytes()) & u16::from_ne_bytes([0xFF, 0x00]));
}

#[rstest]
fn reverse_flips_byte_order_only() {
    let buffer = ByteBuffer::<3>::from_array([0b0000_0001, 0x22, 0x33]);
    assert_eq!(buffer.reverse().as_array(), &[0x33, 0x22, 0b0000_0001]);
    assert_eq!(buffer.reverse().reverse(), buffer);
}

#[rstest]
fn endian_views_match_integer_encodings() {
    let buffer = ByteBuffer::<4>::from_int(0x0102_0304u32);
    assert_eq!(buffer.to_endian(Order::Big).as_array(), &0x0102_0304u32.to_be_bytes());
    assert_eq!(buffer.to_endian(Order::Little).as_array(), &0x0102_0304u32.to_le_bytes());
    assert_eq!(buffer.to_endian(Order::Big).from_endian(Order::Big), buffer);
}

#[rstest]
fn ordering_is_lexicographic_by_byte() {
    let a = ByteBuffer::<3>::from_array([1, 0, 0]);
    let b = ByteBuffer::<3>::from_array([0, 9, 9]);
    let c = ByteBuffer::<3>::from_array([1, 0, 1]);
    assert!(b < a);
    assert!(a < c);
    assert_eq!(a, ByteBuffer::from([1, 0, 0]));
}

#[rstest]
fn capacity_and_iteration() {
    let mut buffer = ByteBuffer::<5>::from_array([1, 2, 3, 4, 5]);
    assert_eq!(buffer.size(), 5);
    assert_eq!(buffer.bit_size(), 40);
    assert!(!buffer.is_empty());
    assert_eq!(buffer.iter().copied().sum::<u8>(), 15);

    for byte in &mut buffer {
        *byte *= 2;
    }
    assert_eq!(buffer.into_iter().collect::<Vec<_>>(), vec![2, 4, 6, 8, 10]);

    buffer.fill(7);
    assert_eq!(<[u8; 5]>::from(buffer), [7; 5]);
    buffer.clear();
    assert_eq!(buffer, ByteBuffer::new());
}
