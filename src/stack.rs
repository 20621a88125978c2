use crate::error::Error;

pub const STACK_DEPTH: usize = 16;

/// Return-address stack used by CALL (2nnn) and RET (00ee)
#[derive(Default)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    stack_pointer: usize,
}

impl CallStack {
    pub fn push(&mut self, addr: u16) -> Result<(), Error> {
        if self.stack_pointer == STACK_DEPTH {
            return Err(Error::StackOverflow(addr));
        }

        self.frames[self.stack_pointer] = addr;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Error> {
        if self.stack_pointer == 0 {
            return Err(Error::StackUnderflow);
        }

        self.stack_pointer -= 1;
        Ok(self.frames[self.stack_pointer])
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.stack_pointer
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stack_pointer == 0
    }

    pub fn clear(&mut self) {
        self.frames = [0; STACK_DEPTH];
        self.stack_pointer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() -> Result<(), Error> {
        let mut stack = CallStack::default();
        stack.push(0x202)?;
        stack.push(0x30A)?;

        assert_eq!(stack.pop()?, 0x30A);
        assert_eq!(stack.pop()?, 0x202);
        assert!(stack.is_empty());
        Ok(())
    }

    #[test]
    fn seventeenth_push_overflows() -> Result<(), Error> {
        let mut stack = CallStack::default();
        for i in 0..STACK_DEPTH as u16 {
            stack.push(0x200 + i * 2)?;
        }

        assert!(matches!(stack.push(0x400), Err(Error::StackOverflow(0x400))));
        assert_eq!(stack.len(), STACK_DEPTH);
        Ok(())
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut stack = CallStack::default();
        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
    }
}
