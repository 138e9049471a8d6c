use crate::bitwise::Bits;
use crate::cpu::alu_instruction::ArithmeticOpResult;
use crate::cpu::condition::Condition;

/// Current Program Status Register. Only the four top bits carry state in
/// this machine: N (31), Z (30), C (29), V (28).
#[derive(Default, Clone, Copy)]
pub struct Cpsr(u32);

impl Cpsr {
    pub(crate) fn can_execute(&self, cond: Condition) -> bool {
        use Condition::*;
        match cond {
            EQ => self.zero_flag(),
            NE => !self.zero_flag(),
            CS => self.carry_flag(),
            CC => !self.carry_flag(),
            MI => self.sign_flag(),
            PL => !self.sign_flag(),
            VS => self.overflow_flag(),
            VC => !self.overflow_flag(),
            HI => self.carry_flag() && !self.zero_flag(),
            LS => !self.carry_flag() && self.zero_flag(),
            GE => self.sign_flag() == self.overflow_flag(),
            LT => self.sign_flag() != self.overflow_flag(),
            GT => !self.zero_flag() && (self.sign_flag() == self.overflow_flag()),
            LE => self.zero_flag() || (self.sign_flag() != self.overflow_flag()),
            AL => true,
            NV => false,
        }
    }

    /// N => Bit 31, (0=Not Signed, 1=Signed)
    pub fn sign_flag(&self) -> bool {
        self.0.get_bit(31)
    }

    /// Z => Bit 30, (0=Not Zero, 1=Zero)
    pub fn zero_flag(&self) -> bool {
        self.0.get_bit(30)
    }

    /// C => Bit 29, (0=Borrow/No Carry, 1=Carry/No Borrow)
    pub fn carry_flag(&self) -> bool {
        self.0.get_bit(29)
    }

    /// V => Bit 28, (0=No Overflow, 1=Overflow)
    pub fn overflow_flag(&self) -> bool {
        self.0.get_bit(28)
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.0.set_bit(31, value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.0.set_bit(30, value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.0.set_bit(29, value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.0.set_bit(28, value);
    }

    pub(crate) fn set_flags(&mut self, op_result: &ArithmeticOpResult) {
        self.set_carry_flag(op_result.carry);
        self.set_zero_flag(op_result.zero);
        self.set_sign_flag(op_result.sign);
        self.set_overflow_flag(op_result.overflow);
    }

    /// The raw register word, for hosts that display it.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_sign_flag() {
        let mut cpsr = Cpsr::default();
        cpsr.set_sign_flag(true);
        assert!(cpsr.sign_flag());
        assert_eq!(cpsr.bits(), 1 << 31);
    }

    #[test]
    fn check_zero_flag() {
        let mut cpsr = Cpsr::default();
        cpsr.set_zero_flag(true);
        assert!(cpsr.zero_flag());
    }

    #[test]
    fn check_carry_flag() {
        let mut cpsr = Cpsr::default();
        cpsr.set_carry_flag(true);
        assert!(cpsr.carry_flag());
    }

    #[test]
    fn check_overflow_flag() {
        let mut cpsr = Cpsr::default();
        cpsr.set_overflow_flag(true);
        assert!(cpsr.overflow_flag());
    }

    #[test]
    fn al_always_executes_nv_never() {
        let cpsr = Cpsr::default();
        assert!(cpsr.can_execute(Condition::AL));
        assert!(!cpsr.can_execute(Condition::NV));

        let mut all_set = Cpsr::default();
        all_set.set_sign_flag(true);
        all_set.set_zero_flag(true);
        all_set.set_carry_flag(true);
        all_set.set_overflow_flag(true);
        assert!(all_set.can_execute(Condition::AL));
        assert!(!all_set.can_execute(Condition::NV));
    }

    #[test]
    fn signed_comparisons_track_n_and_v() {
        let mut cpsr = Cpsr::default();
        assert!(cpsr.can_execute(Condition::GE));
        assert!(cpsr.can_execute(Condition::GT));
        assert!(!cpsr.can_execute(Condition::LT));

        cpsr.set_sign_flag(true);
        assert!(!cpsr.can_execute(Condition::GE));
        assert!(cpsr.can_execute(Condition::LT));
        assert!(cpsr.can_execute(Condition::LE));

        cpsr.set_overflow_flag(true);
        assert!(cpsr.can_execute(Condition::GE));
        assert!(!cpsr.can_execute(Condition::LT));
    }
}
