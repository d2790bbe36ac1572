/*!

  Programs are flat sequences of signed 64 bit words, and the same memory holds code and data.
  An instruction is one opcode word followed by zero to three parameter words. The opcode word
  is read in decimal:

    ABCDE
      DE:  operation (two digits)
      C:   mode of the first parameter
      B:   mode of the second parameter
      A:   mode of the third parameter

  Leading zeros are omitted, so missing mode digits are position mode. An enum is used for
  the operation and for each mode; the decoded `Instruction` is a transient view that is
  rebuilt on every fetch and never written back.

*/

mod assembly;
mod instruction;
mod operation;

pub use assembly::{disassemble, parse_program, Program};
pub use instruction::{decode_word, Instruction, Parameter, MAX_PARAMETERS};
pub use operation::{Mode, Operation};

pub type Word = i64;
