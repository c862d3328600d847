use num_complex::Complex;
use num_traits::Zero;

use crate::array_utils::{DoubleBuf, LoadStore};
use crate::common::{validate_inplace, validate_outofplace, FftNum};
use crate::twiddles;
use crate::{Direction, Fft, FftDirection, FftResult, Length};

macro_rules! boilerplate_fft_butterfly {
    ($struct_name:ident, $len:expr) => {
        impl<T: FftNum> $struct_name<T> {
            #[inline(always)]
            pub(crate) fn perform_fft_butterfly(&self, buffer: impl LoadStore<T>) {
                self.perform_fft_contiguous(buffer);
            }
        }
        impl<T: FftNum> Fft<T> for $struct_name<T> {
            fn process_outofplace_with_scratch(
                &self,
                input: &mut [Complex<T>],
                output: &mut [Complex<T>],
                scratch: &mut [Complex<T>],
            ) -> FftResult<()> {
                self.process_immutable_with_scratch(input, output, scratch)
            }
            fn process_immutable_with_scratch(
                &self,
                input: &[Complex<T>],
                output: &mut [Complex<T>],
                _scratch: &mut [Complex<T>],
            ) -> FftResult<()> {
                validate_outofplace(self.len(), input.len(), output.len(), 0, 0)?;

                for (in_chunk, out_chunk) in input
                    .chunks_exact(self.len())
                    .zip(output.chunks_exact_mut(self.len()))
                {
                    self.perform_fft_butterfly(DoubleBuf {
                        input: in_chunk,
                        output: out_chunk,
                    });
                }
                Ok(())
            }
            fn process_with_scratch(
                &self,
                buffer: &mut [Complex<T>],
                _scratch: &mut [Complex<T>],
            ) -> FftResult<()> {
                validate_inplace(self.len(), buffer.len(), 0, 0)?;

                for chunk in buffer.chunks_exact_mut(self.len()) {
                    self.perform_fft_butterfly(chunk);
                }
                Ok(())
            }
            #[inline(always)]
            fn get_inplace_scratch_len(&self) -> usize {
                0
            }
            #[inline(always)]
            fn get_outofplace_scratch_len(&self) -> usize {
                0
            }
            #[inline(always)]
            fn get_immutable_scratch_len(&self) -> usize {
                0
            }
        }
        impl<T> Length for $struct_name<T> {
            #[inline(always)]
            fn len(&self) -> usize {
                $len
            }
        }
        impl<T> Direction for $struct_name<T> {
            #[inline(always)]
            fn fft_direction(&self) -> FftDirection {
                self.direction
            }
        }
    };
}

// Butterflies for odd prime sizes.
//
// Pairs up inputs `k` and `len - k`: the twiddles for the pair are conjugates of each other,
// so each output pair `m`, `len - m` only needs the real parts applied to the sums
// and the imaginary parts applied to the differences.
macro_rules! prime_butterfly {
    ($(#[$meta:meta])* $struct_name:ident, $len:expr, $half:expr) => {
        $(#[$meta])*
        pub struct $struct_name<T> {
            twiddles: [Complex<T>; $half],
            direction: FftDirection,
        }
        boilerplate_fft_butterfly!($struct_name, $len);
        impl<T: FftNum> $struct_name<T> {
            pub fn new(direction: FftDirection) -> Self {
                Self {
                    twiddles: std::array::from_fn(|i| {
                        twiddles::compute_twiddle(i + 1, $len, direction)
                    }),
                    direction,
                }
            }

            // the twiddle for `index`, split into its (re, im) parts
            #[inline(always)]
            fn twiddle_parts(&self, index: usize) -> (T, T) {
                if index <= $half {
                    let twiddle = self.twiddles[index - 1];
                    (twiddle.re, twiddle.im)
                } else {
                    let twiddle = self.twiddles[$len - index - 1];
                    (twiddle.re, -twiddle.im)
                }
            }

            #[inline(never)]
            fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
                let first = buffer.load(0);

                let mut sums = [Complex::zero(); $half];
                let mut diffs = [Complex::zero(); $half];
                for k in 0..$half {
                    let upper = buffer.load(k + 1);
                    let lower = buffer.load($len - 1 - k);
                    sums[k] = upper + lower;
                    diffs[k] = upper - lower;
                }

                let mut dc = first;
                for sum in sums.iter() {
                    dc = dc + *sum;
                }
                buffer.store(dc, 0);

                for m in 1..=$half {
                    let mut real_part = first;
                    let mut imag_part: Complex<T> = Complex::zero();

                    // walks (k + 1) * m mod len
                    let mut twiddle_index = 0;
                    for k in 0..$half {
                        twiddle_index += m;
                        if twiddle_index >= $len {
                            twiddle_index -= $len;
                        }
                        let (twiddle_re, twiddle_im) = self.twiddle_parts(twiddle_index);
                        real_part = real_part + sums[k] * twiddle_re;
                        imag_part = imag_part + diffs[k] * twiddle_im;
                    }

                    // multiply the imaginary part by i
                    let rotated = Complex {
                        re: -imag_part.im,
                        im: imag_part.re,
                    };
                    buffer.store(real_part + rotated, m);
                    buffer.store(real_part - rotated, $len - m);
                }
            }
        }
    };
}

pub struct Butterfly1<T> {
    direction: FftDirection,
    _phantom: std::marker::PhantomData<T>,
}
boilerplate_fft_butterfly!(Butterfly1, 1);
impl<T: FftNum> Butterfly1<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            direction,
            _phantom: std::marker::PhantomData,
        }
    }
    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        let value = buffer.load(0);
        buffer.store(value, 0);
    }
}

pub struct Butterfly2<T> {
    direction: FftDirection,
    _phantom: std::marker::PhantomData<T>,
}
boilerplate_fft_butterfly!(Butterfly2, 2);
impl<T: FftNum> Butterfly2<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            direction,
            _phantom: std::marker::PhantomData,
        }
    }
    #[inline(always)]
    fn perform_fft_strided(left: &mut Complex<T>, right: &mut Complex<T>) {
        let temp = *left + *right;

        *right = *left - *right;
        *left = temp;
    }
    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        let value0 = buffer.load(0);
        let value1 = buffer.load(1);
        buffer.store(value0 + value1, 0);
        buffer.store(value0 - value1, 1);
    }
}

pub struct Butterfly3<T> {
    twiddle: Complex<T>,
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly3, 3);
impl<T: FftNum> Butterfly3<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            twiddle: twiddles::compute_twiddle(1, 3, direction),
            direction,
        }
    }

    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        let value0 = buffer.load(0);
        let xp = buffer.load(1) + buffer.load(2);
        let xn = buffer.load(1) - buffer.load(2);
        let sum = value0 + xp;

        let temp_a = value0
            + Complex {
                re: self.twiddle.re * xp.re,
                im: self.twiddle.re * xp.im,
            };
        let temp_b = Complex {
            re: -self.twiddle.im * xn.im,
            im: self.twiddle.im * xn.re,
        };

        buffer.store(sum, 0);
        buffer.store(temp_a + temp_b, 1);
        buffer.store(temp_a - temp_b, 2);
    }
}

pub struct Butterfly4<T> {
    direction: FftDirection,
    _phantom: std::marker::PhantomData<T>,
}
boilerplate_fft_butterfly!(Butterfly4, 4);
impl<T: FftNum> Butterfly4<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            direction,
            _phantom: std::marker::PhantomData,
        }
    }
    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // one hardcoded step of mixed radix, with width=2 and height=2
        let mut value0 = buffer.load(0);
        let mut value1 = buffer.load(1);
        let mut value2 = buffer.load(2);
        let mut value3 = buffer.load(3);

        // column FFTs
        Butterfly2::perform_fft_strided(&mut value0, &mut value2);
        Butterfly2::perform_fft_strided(&mut value1, &mut value3);

        // the only nontrivial twiddle factor is a quarter turn
        value3 = twiddles::rotate_90(value3, self.direction);

        // row FFTs
        Butterfly2::perform_fft_strided(&mut value0, &mut value1);
        Butterfly2::perform_fft_strided(&mut value2, &mut value3);

        // the output transpose swaps index 1 and 2
        buffer.store(value0, 0);
        buffer.store(value2, 1);
        buffer.store(value1, 2);
        buffer.store(value3, 3);
    }
}

prime_butterfly!(Butterfly5, 5, 2);

pub struct Butterfly6<T> {
    butterfly3: Butterfly3<T>,
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly6, 6);
impl<T: FftNum> Butterfly6<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            butterfly3: Butterfly3::new(direction),
            direction,
        }
    }
    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // GCD(2,3) == 1, so a step of Good-Thomas needs no twiddle factors.
        // input (row, col) comes from (3 * row + 2 * col) % 6
        let mut rows = [
            [buffer.load(0), buffer.load(2), buffer.load(4)],
            [buffer.load(3), buffer.load(5), buffer.load(1)],
        ];

        for row in rows.iter_mut() {
            self.butterfly3.perform_fft_contiguous(row);
        }

        for col in 0..3 {
            let [top, bottom] = &mut rows;
            Butterfly2::perform_fft_strided(&mut top[col], &mut bottom[col]);
        }

        // output (row, col) goes to the CRT index (3 * row + 4 * col) % 6
        for (row_index, row) in rows.iter().enumerate() {
            for (col_index, value) in row.iter().enumerate() {
                buffer.store(*value, (3 * row_index + 4 * col_index) % 6);
            }
        }
    }
}

prime_butterfly!(Butterfly7, 7, 3);

pub struct Butterfly8<T> {
    root2: T,
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly8, 8);
impl<T: FftNum> Butterfly8<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            root2: T::from_f64_lossy(0.5f64.sqrt()),
            direction,
        }
    }

    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        let butterfly4 = Butterfly4::new(self.direction);

        // one step of mixed radix with width=2 and height=4. The out-of-place path runs this same
        // code through a DoubleBuf, so both paths share one output ordering.
        let mut evens = [
            buffer.load(0),
            buffer.load(2),
            buffer.load(4),
            buffer.load(6),
        ];
        let mut odds = [
            buffer.load(1),
            buffer.load(3),
            buffer.load(5),
            buffer.load(7),
        ];

        butterfly4.perform_fft_contiguous(&mut evens);
        butterfly4.perform_fft_contiguous(&mut odds);

        // twiddles 1 and 3 are eighth turns, twiddle 2 is a quarter turn
        odds[1] = (twiddles::rotate_90(odds[1], self.direction) + odds[1]) * self.root2;
        odds[2] = twiddles::rotate_90(odds[2], self.direction);
        odds[3] = (twiddles::rotate_90(odds[3], self.direction) - odds[3]) * self.root2;

        for i in 0..4 {
            Butterfly2::perform_fft_strided(&mut evens[i], &mut odds[i]);
        }

        for i in 0..4 {
            buffer.store(evens[i], i);
            buffer.store(odds[i], i + 4);
        }
    }
}

pub struct Butterfly9<T> {
    butterfly3: Butterfly3<T>,
    twiddles: [Complex<T>; 3],
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly9, 9);
impl<T: FftNum> Butterfly9<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            butterfly3: Butterfly3::new(direction),
            twiddles: [
                twiddles::compute_twiddle(1, 9, direction),
                twiddles::compute_twiddle(2, 9, direction),
                twiddles::compute_twiddle(4, 9, direction),
            ],
            direction,
        }
    }
    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // mixed radix with width=3 and height=3
        let mut columns = [[Complex::zero(); 3]; 3];
        for (column_index, column) in columns.iter_mut().enumerate() {
            for (row_index, value) in column.iter_mut().enumerate() {
                *value = buffer.load(column_index + 3 * row_index);
            }
            self.butterfly3.perform_fft_contiguous(column);
        }

        let [tw1, tw2, tw4] = self.twiddles;
        columns[1][1] = columns[1][1] * tw1;
        columns[1][2] = columns[1][2] * tw2;
        columns[2][1] = columns[2][1] * tw2;
        columns[2][2] = columns[2][2] * tw4;

        for row_index in 0..3 {
            let mut row = [
                columns[0][row_index],
                columns[1][row_index],
                columns[2][row_index],
            ];
            self.butterfly3.perform_fft_contiguous(&mut row);
            for (column_index, value) in row.iter().enumerate() {
                buffer.store(*value, row_index + 3 * column_index);
            }
        }
    }
}

prime_butterfly!(Butterfly11, 11, 5);

pub struct Butterfly12<T> {
    butterfly3: Butterfly3<T>,
    butterfly4: Butterfly4<T>,
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly12, 12);
impl<T: FftNum> Butterfly12<T> {
    #[inline(always)]
    pub fn new(direction: FftDirection) -> Self {
        Self {
            butterfly3: Butterfly3::new(direction),
            butterfly4: Butterfly4::new(direction),
            direction,
        }
    }
    #[inline(always)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // GCD(4,3) == 1, so a step of Good-Thomas needs no twiddle factors.
        // input (row, col) comes from (4 * row + 3 * col) % 12
        let mut rows = [[Complex::zero(); 4]; 3];
        for (row_index, row) in rows.iter_mut().enumerate() {
            for (col_index, value) in row.iter_mut().enumerate() {
                *value = buffer.load((4 * row_index + 3 * col_index) % 12);
            }
            self.butterfly4.perform_fft_contiguous(row);
        }

        // output (row, col) goes to the CRT index (4 * row + 9 * col) % 12
        for col_index in 0..4 {
            let mut column = [
                rows[0][col_index],
                rows[1][col_index],
                rows[2][col_index],
            ];
            self.butterfly3.perform_fft_contiguous(&mut column);
            for (row_index, value) in column.iter().enumerate() {
                buffer.store(*value, (4 * row_index + 9 * col_index) % 12);
            }
        }
    }
}

prime_butterfly!(Butterfly13, 13, 6);

pub struct Butterfly16<T> {
    butterfly4: Butterfly4<T>,
    twiddles: [Complex<T>; 9],
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly16, 16);
impl<T: FftNum> Butterfly16<T> {
    pub fn new(direction: FftDirection) -> Self {
        // twiddle (column, row) for column and row in 1..4
        let twiddles = std::array::from_fn(|i| {
            let column = i / 3 + 1;
            let row = i % 3 + 1;
            twiddles::compute_twiddle(column * row, 16, direction)
        });
        Self {
            butterfly4: Butterfly4::new(direction),
            twiddles,
            direction,
        }
    }

    #[inline(never)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // mixed radix with width=4 and height=4
        let mut columns = [[Complex::zero(); 4]; 4];
        for (column_index, column) in columns.iter_mut().enumerate() {
            for (row_index, value) in column.iter_mut().enumerate() {
                *value = buffer.load(column_index + 4 * row_index);
            }
            self.butterfly4.perform_fft_contiguous(column);
        }

        for column_index in 1..4 {
            for row_index in 1..4 {
                let twiddle = self.twiddles[(column_index - 1) * 3 + row_index - 1];
                columns[column_index][row_index] = columns[column_index][row_index] * twiddle;
            }
        }

        for row_index in 0..4 {
            let mut row = [
                columns[0][row_index],
                columns[1][row_index],
                columns[2][row_index],
                columns[3][row_index],
            ];
            self.butterfly4.perform_fft_contiguous(&mut row);
            for (column_index, value) in row.iter().enumerate() {
                buffer.store(*value, row_index + 4 * column_index);
            }
        }
    }
}

prime_butterfly!(Butterfly17, 17, 8);
prime_butterfly!(Butterfly19, 19, 9);
prime_butterfly!(Butterfly23, 23, 11);

pub struct Butterfly24<T> {
    butterfly3: Butterfly3<T>,
    butterfly8: Butterfly8<T>,
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly24, 24);
impl<T: FftNum> Butterfly24<T> {
    pub fn new(direction: FftDirection) -> Self {
        Self {
            butterfly3: Butterfly3::new(direction),
            butterfly8: Butterfly8::new(direction),
            direction,
        }
    }
    #[inline(never)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // GCD(8,3) == 1, so a step of Good-Thomas needs no twiddle factors.
        // input (row, col) comes from (8 * row + 3 * col) % 24
        let mut rows = [[Complex::zero(); 8]; 3];
        for (row_index, row) in rows.iter_mut().enumerate() {
            for (col_index, value) in row.iter_mut().enumerate() {
                *value = buffer.load((8 * row_index + 3 * col_index) % 24);
            }
            self.butterfly8.perform_fft_contiguous(row);
        }

        // output (row, col) goes to the CRT index (16 * row + 9 * col) % 24
        for col_index in 0..8 {
            let mut column = [
                rows[0][col_index],
                rows[1][col_index],
                rows[2][col_index],
            ];
            self.butterfly3.perform_fft_contiguous(&mut column);
            for (row_index, value) in column.iter().enumerate() {
                buffer.store(*value, (16 * row_index + 9 * col_index) % 24);
            }
        }
    }
}

pub struct Butterfly27<T> {
    butterfly3: Butterfly3<T>,
    butterfly9: Butterfly9<T>,
    twiddles: [Complex<T>; 16],
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly27, 27);
impl<T: FftNum> Butterfly27<T> {
    pub fn new(direction: FftDirection) -> Self {
        // twiddle (column, row) for column in 1..3 and row in 1..9
        let twiddles = std::array::from_fn(|i| {
            let column = i / 8 + 1;
            let row = i % 8 + 1;
            twiddles::compute_twiddle(column * row, 27, direction)
        });
        Self {
            butterfly3: Butterfly3::new(direction),
            butterfly9: Butterfly9::new(direction),
            twiddles,
            direction,
        }
    }
    #[inline(never)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // mixed radix with width=3 and height=9
        let mut columns = [[Complex::zero(); 9]; 3];
        for (column_index, column) in columns.iter_mut().enumerate() {
            for (row_index, value) in column.iter_mut().enumerate() {
                *value = buffer.load(column_index + 3 * row_index);
            }
            self.butterfly9.perform_fft_contiguous(column);
        }

        for column_index in 1..3 {
            for row_index in 1..9 {
                let twiddle = self.twiddles[(column_index - 1) * 8 + row_index - 1];
                columns[column_index][row_index] = columns[column_index][row_index] * twiddle;
            }
        }

        for row_index in 0..9 {
            let mut row = [
                columns[0][row_index],
                columns[1][row_index],
                columns[2][row_index],
            ];
            self.butterfly3.perform_fft_contiguous(&mut row);
            for (column_index, value) in row.iter().enumerate() {
                buffer.store(*value, row_index + 9 * column_index);
            }
        }
    }
}

prime_butterfly!(Butterfly29, 29, 14);
prime_butterfly!(Butterfly31, 31, 15);

pub struct Butterfly32<T> {
    butterfly8: Butterfly8<T>,
    butterfly16: Butterfly16<T>,
    twiddles: [Complex<T>; 7],
    direction: FftDirection,
}
boilerplate_fft_butterfly!(Butterfly32, 32);
impl<T: FftNum> Butterfly32<T> {
    pub fn new(direction: FftDirection) -> Self {
        Self {
            butterfly8: Butterfly8::new(direction),
            butterfly16: Butterfly16::new(direction),
            twiddles: std::array::from_fn(|i| twiddles::compute_twiddle(i + 1, 32, direction)),
            direction,
        }
    }

    #[inline(never)]
    fn perform_fft_contiguous(&self, mut buffer: impl LoadStore<T>) {
        // one step of split radix: a size-16 FFT of the evens, plus size-8 FFTs of
        // the odds at 4k+1 and 4k-1, whose twiddles are conjugates of each other
        let mut evens = [Complex::zero(); 16];
        for (i, value) in evens.iter_mut().enumerate() {
            *value = buffer.load(2 * i);
        }
        let mut odds_n1 = [Complex::zero(); 8];
        let mut odds_n3 = [Complex::zero(); 8];
        for i in 0..8 {
            odds_n1[i] = buffer.load(4 * i + 1);
            odds_n3[i] = buffer.load((4 * i + 31) % 32);
        }

        self.butterfly16.perform_fft_contiguous(&mut evens);
        self.butterfly8.perform_fft_contiguous(&mut odds_n1);
        self.butterfly8.perform_fft_contiguous(&mut odds_n3);

        for i in 1..8 {
            odds_n1[i] = odds_n1[i] * self.twiddles[i - 1];
            odds_n3[i] = odds_n3[i] * self.twiddles[i - 1].conj();
        }

        for i in 0..8 {
            Butterfly2::perform_fft_strided(&mut odds_n1[i], &mut odds_n3[i]);
            odds_n3[i] = twiddles::rotate_90(odds_n3[i], self.direction);
        }

        for i in 0..8 {
            buffer.store(evens[i] + odds_n1[i], i);
            buffer.store(evens[i + 8] + odds_n3[i], i + 8);
            buffer.store(evens[i] - odds_n1[i], i + 16);
            buffer.store(evens[i + 8] - odds_n3[i], i + 24);
        }
    }
}
