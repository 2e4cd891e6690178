use galois_seq::{mat, seq, GResult, GrowableSequence, GrowthPolicy, Matrix};

fn main() -> GResult<()> {
    let mut s = seq![3, 1, 4];
    s.insert_at(1, 5)?;
    s.append(9);
    println!("{}", s);

    let mut g = GrowableSequence::with_policy(GrowthPolicy::new(2, 1.5)?);
    for i in 0..10 {
        g.append(i);
    }
    while g.remove_last().is_some() {}
    println!("{}", g);

    let m1 = mat![[1, 2, 3, 4], [4, 5, 6, 7], [8, 9, 10, 11]]?;
    let m2 = mat![[3, 2], [9, 21], [32, 11], [42, 14]]?;
    let m3 = (&m1 * &m2)?;
    print!("{}", m3);
    print!("{}", m1.transpose());

    let m4: Matrix<f32> = Matrix::new(2, 2)?;
    println!("{:?}", m4);
    if let Err(e) = &m1 * &m1 {
        println!("{}", e);
    }
    Ok(())
}
