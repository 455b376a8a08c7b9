use log::debug;
use rand::Rng;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, ENTRY_POINT, FLAG, GLYPH_SIZE, MEMORY_SIZE};
use crate::error::Fault;
use crate::instruction::{Flow, Peripherals};
use crate::opcode::Opcode;
use crate::state::State;

/// Checks that a jump or call target lies inside the program region
pub fn validate_target(address: u16) -> Result<u16, Fault> {
    if address < ENTRY_POINT || address as usize >= MEMORY_SIZE {
        Err(Fault::AddressError { address })
    } else {
        Ok(address)
    }
}

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}

/// call machine code at addr
/// Only meaningful on the COSMAC VIP; ignored here
pub fn sys(op: u16, _state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    debug!("ignoring machine code routine at {:#05X}", op.addr());
    Ok(Flow::Next)
}

/// clear
pub fn clr(_op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    for row in state.frame_buffer.iter_mut() {
        *row = [0; DISPLAY_WIDTH];
    }
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// PC = STACK.pop()
/// The popped address is the call itself, so PC still moves on past it
pub fn rts(_op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.pc = state.pop()?;
    Ok(Flow::Next)
}

/// PC = addr
pub fn jump(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.pc = validate_target(op.addr())?;
    Ok(Flow::Jump)
}

/// STACK.push(PC); PC = addr
pub fn call(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let target = validate_target(op.addr())?;
    state.push(state.pc)?;
    state.pc = target;
    Ok(Flow::Jump)
}

/// if Vx == kk then pc += 2
pub fn ske(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    Ok(skip_if(state.v[op.x()] == op.kk()))
}

/// if Vx != kk then pc += 2
pub fn skne(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    Ok(skip_if(state.v[op.x()] != op.kk()))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    Ok(skip_if(state.v[op.x()] == state.v[op.y()]))
}

/// Vx = kk
pub fn load(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] = op.kk();
    Ok(Flow::Next)
}

/// Vx += kk
/// Overflow wraps and doesn't touch VF
pub fn add(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.kk());
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] = state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(Flow::Next)
}

/// Vx += Vy; VF = overflow
pub fn addr(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[FLAG] = over as u8;
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let (res, under) = state.v[op.x()].overflowing_sub(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[FLAG] = !under as u8;
    Ok(Flow::Next)
}

/// Vx >>= 1; VF = lsb
pub fn shr(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let lsb = state.v[op.x()] & 0x1;
    state.v[op.x()] >>= 1;
    state.v[FLAG] = lsb;
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let (res, under) = state.v[op.y()].overflowing_sub(state.v[op.x()]);
    state.v[op.x()] = res;
    state.v[FLAG] = !under as u8;
    Ok(Flow::Next)
}

/// Vx <<= 1; VF = msb
pub fn shl(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let msb = state.v[op.x()] >> 7;
    state.v[op.x()] <<= 1;
    state.v[FLAG] = msb;
    Ok(Flow::Next)
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    Ok(skip_if(state.v[op.x()] != state.v[op.y()]))
}

/// I = addr
pub fn loadi(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.i = op.addr();
    Ok(Flow::Next)
}

/// PC = V0 + addr
pub fn jumpi(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.pc = validate_target(u16::from(state.v[0x0]) + op.addr())?;
    Ok(Flow::Jump)
}

/// Vx = rand_byte & kk
pub fn rand(op: u16, state: &mut State, io: &mut Peripherals) -> Result<Flow, Fault> {
    let rand_byte: u8 = io.rng.gen();
    state.v[op.x()] = rand_byte & op.kk();
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased and the draw flag if any pixels changed.
pub fn draw(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let height = op.n() as usize;
    let mut sprite = [0u8; 0xF];
    sprite[..height].copy_from_slice(state.read(state.i as usize, height)?);

    let origin_x = state.v[op.x()] as usize;
    let origin_y = state.v[op.y()] as usize;
    let mut collision = 0x0;

    for (row, byte) in sprite[..height].iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let pixel_value = (byte >> (7 - bit)) & 0x1;
            if pixel_value == 0 {
                continue;
            }
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            collision |= state.frame_buffer[y][x];
            state.frame_buffer[y][x] ^= pixel_value;
            state.draw_flag = true;
        }
    }

    state.v[FLAG] = collision;
    Ok(Flow::Next)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: u16, state: &mut State, io: &mut Peripherals) -> Result<Flow, Fault> {
    Ok(skip_if(io.keys.is_pressed(state.v[op.x()])))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: u16, state: &mut State, io: &mut Peripherals) -> Result<Flow, Fault> {
    Ok(skip_if(!io.keys.is_pressed(state.v[op.x()])))
}

/// Vx = DT
pub fn moved(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.v[op.x()] = state.delay_timer;
    Ok(Flow::Next)
}

/// await keypress for Vx
/// Holds the pc in place until some key is down, so the instruction is retried every cycle
pub fn keyd(op: u16, state: &mut State, io: &mut Peripherals) -> Result<Flow, Fault> {
    match io.keys.first_pressed() {
        Some(key) => {
            state.v[op.x()] = key;
            Ok(Flow::Next)
        }
        None => Ok(Flow::Wait),
    }
}

/// DT = Vx
pub fn loads(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.delay_timer = state.v[op.x()];
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.sound_timer = state.v[op.x()];
    Ok(Flow::Next)
}

/// I += Vx
/// I isn't masked to the address space; reads through it are bounds checked instead
pub fn addi(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    Ok(Flow::Next)
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::FONT_SET for more details
pub fn ldspr(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    state.i = u16::from(state.v[op.x()]) * GLYPH_SIZE;
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let value = state.v[op.x()];
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.write(state.i as usize, &digits)?;
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let registers = state.v;
    state.write(state.i as usize, &registers[..=op.x()])?;
    state.i = state.i.wrapping_add(op.x() as u16 + 1);
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(op: u16, state: &mut State, _io: &mut Peripherals) -> Result<Flow, Fault> {
    let count = op.x() + 1;
    let mut registers = state.v;
    registers[..count].copy_from_slice(state.read(state.i as usize, count)?);
    state.v = registers;
    state.i = state.i.wrapping_add(count as u16);
    Ok(Flow::Next)
}
