use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START};
use crate::opcode::Opcode;
use crate::state::State;

// Operations run after fetch has already advanced the pc past the opcode.
// They only touch the pc to jump, to skip (+2), or to rewind (-2) so the
// same opcode is fetched again on the next cycle.

/// Returns whether the key is currently held.
/// A key outside the 16-key keypad is a contract violation by the program.
fn key_held(pressed_keys: &[bool; 16], key: u8) -> bool {
    match pressed_keys.get(key as usize) {
        Some(&held) => held,
        None => panic!("key {:#04X} is outside the 16-key keypad", key),
    }
}

/// Unknown opcode; deliberately tolerated as a no-op
pub fn nop(_op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    *state
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    if state.sp == 0 {
        panic!(
            "00EE with an empty call stack at address {:#05X}",
            state.pc - 0x2
        );
    }
    State {
        pc: state.stack[state.sp as usize],
        sp: state.sp - 0x1,
        ..*state
    }
}

/// PC = nnn
pub fn jump(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        pc: op.nnn(),
        ..*state
    }
}

/// STACK.push(PC); PC = nnn
/// The pushed pc already points at the instruction after the call.
pub fn call(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let sp = state.sp + 0x1;
    let mut stack = state.stack;
    stack[sp as usize] = state.pc;
    State {
        pc: op.nnn(),
        sp,
        stack,
        ..*state
    }
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let pc = if state.v[op.x() as usize] == op.nn() {
        state.pc + 0x2
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let pc = if state.v[op.x() as usize] != op.nn() {
        state.pc + 0x2
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let pc = if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.pc + 0x2
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[op.x() as usize] = op.nn();
    State { v, ..*state }
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it
pub fn add(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let (res, _) = state.v[op.x() as usize].overflowing_add(op.nn());
    let mut v = state.v;
    v[op.x() as usize] = res;
    State { v, ..*state }
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[op.x() as usize] = v[op.y() as usize];
    State { v, ..*state }
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[op.x() as usize] |= v[op.y() as usize];
    State { v, ..*state }
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[op.x() as usize] &= v[op.y() as usize];
    State { v, ..*state }
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[op.x() as usize] ^= v[op.y() as usize];
    State { v, ..*state }
}

/// Vx += Vy; VF = carry
/// The flag is written after the result so it wins when Vx is VF itself.
pub fn addr(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let (res, over) = state.v[op.x() as usize].overflowing_add(state.v[op.y() as usize]);
    let mut v = state.v;
    v[op.x() as usize] = res;
    v[0xF] = if over { 0x1 } else { 0x0 };
    State { v, ..*state }
}

/// Vx -= Vy; VF = !borrow
pub fn sub(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let (res, under) = state.v[op.x() as usize].overflowing_sub(state.v[op.y() as usize]);
    let mut v = state.v;
    v[op.x() as usize] = res;
    v[0xF] = if under { 0x0 } else { 0x1 };
    State { v, ..*state }
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let shifted_out = state.v[op.x() as usize] & 0x1;
    let mut v = state.v;
    v[op.x() as usize] >>= 1;
    v[0xF] = shifted_out;
    State { v, ..*state }
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let (res, under) = state.v[op.y() as usize].overflowing_sub(state.v[op.x() as usize]);
    let mut v = state.v;
    v[op.x() as usize] = res;
    v[0xF] = if under { 0x0 } else { 0x1 };
    State { v, ..*state }
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let shifted_out = (state.v[op.x() as usize] >> 7) & 0x1;
    let mut v = state.v;
    v[op.x() as usize] <<= 1;
    v[0xF] = shifted_out;
    State { v, ..*state }
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let pc = if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.pc + 0x2
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// I = nnn
pub fn loadi(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        i: op.nnn(),
        ..*state
    }
}

/// PC = V0 + nnn
pub fn jumpi(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        pc: u16::from(state.v[0x0]) + op.nnn(),
        ..*state
    }
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let rand_byte: u8 = rand::random();
    let mut v = state.v;
    v[op.x() as usize] = rand_byte & op.nn();
    State { v, ..*state }
}

/// draw_sprite(x=Vx y=Vy rows=n)
/// XORs a sprite read from memory[i..] at position x, y on the FrameBuffer.
/// The start position wraps around the screen edges but the sprite itself is
/// clipped: rows past the bottom edge abort the draw and bits past the right
/// edge abort the row. Sets VF if any pixel is flipped off.
pub fn draw(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    let x_pos = state.v[op.x() as usize] as usize % DISPLAY_WIDTH;
    let y_pos = state.v[op.y() as usize] as usize % DISPLAY_HEIGHT;

    // Reset the collision flag
    v[0xF] = 0x0;

    for row in 0..op.n() as usize {
        let y = y_pos + row;
        if y >= DISPLAY_HEIGHT {
            break;
        }
        let byte = state.memory[state.i as usize + row];
        for bit in 0..8 {
            let x = x_pos + bit;
            if x >= DISPLAY_WIDTH {
                break;
            }
            let pixel = (byte >> (7 - bit)) & 0x1;
            v[0xF] |= pixel & frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    State {
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    }
}

/// if Vx.held then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, pressed_keys: [bool; 16]) -> State {
    let pc = if key_held(&pressed_keys, state.v[op.x() as usize]) {
        state.pc + 0x2
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// if !Vx.held then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, pressed_keys: [bool; 16]) -> State {
    let pc = if !key_held(&pressed_keys, state.v[op.x() as usize]) {
        state.pc + 0x2
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer as u8;
    State { v, ..*state }
}

/// Vx = await keypress
/// Waits for a full press-then-release edge without blocking: held keys are
/// marked in waiting_keys, and the first marked key seen released completes
/// the wait. Until then the pc is rewound so the driver re-executes this
/// opcode on the next cycle.
pub fn keyd(op: &dyn Opcode, state: &State, pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    let mut waiting_keys = state.waiting_keys;
    let mut pc = state.pc;

    let mut released = None;
    for key in 0x0..=0xF {
        if !pressed_keys[key] && waiting_keys[key] {
            released = Some(key);
            break;
        } else if pressed_keys[key] {
            waiting_keys[key] = true;
        }
    }

    match released {
        Some(key) => {
            v[op.x() as usize] = key as u8;
            waiting_keys[key] = false;
        }
        None => pc -= 0x2,
    }

    State {
        pc,
        v,
        waiting_keys,
        ..*state
    }
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        delay_timer: f64::from(state.v[op.x() as usize]),
        ..*state
    }
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        sound_timer: f64::from(state.v[op.x() as usize]),
        ..*state
    }
}

/// I += Vx; VF = 1 if the sum leaves the address range
/// I is deliberately not masked back into 12 bits.
pub fn addi(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let i = state.i + u16::from(state.v[op.x() as usize]);
    let mut v = state.v;
    if i > 0xFFF {
        v[0xF] = 0x1;
    }
    State { i, v, ..*state }
}

/// I = FONT_START + (Vx & 0xF) * 5
/// Set I to the memory address of the glyph for Vx's low nibble.
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    State {
        i: FONT_START + u16::from(state.v[op.x() as usize] & 0x0F) * 5,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let bcd = [
        state.v[op.x() as usize] / 100 % 10,
        state.v[op.x() as usize] / 10 % 10,
        state.v[op.x() as usize] % 10,
    ];
    let mut memory = state.memory;
    memory[state.i as usize..(state.i + 0x3) as usize].copy_from_slice(&bcd);
    State { memory, ..*state }
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut memory = state.memory;
    memory[state.i as usize..=(state.i + u16::from(op.x())) as usize]
        .copy_from_slice(&state.v[0x0..=op.x() as usize]);
    State { memory, ..*state }
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &State, _pressed_keys: [bool; 16]) -> State {
    let mut v = state.v;
    v[0x0..=op.x() as usize]
        .copy_from_slice(&state.memory[state.i as usize..=(state.i + u16::from(op.x())) as usize]);
    State { v, ..*state }
}
